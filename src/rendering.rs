//! Factory pour le contexte de rendu GPU.
//!
//! Le webview occupe toute la fenêtre : Servo peint directement dans le
//! `WindowRenderingContext`, sans FBO intermédiaire.

use std::error::Error;
use std::rc::Rc;

use servo::{RenderingContext, WindowRenderingContext};
use winit::dpi::PhysicalSize;
use winit::raw_window_handle::{DisplayHandle, WindowHandle};

/// Crée un contexte OpenGL (surfman) lié à la fenêtre winit et le rend
/// courant, ce qui est requis avant de le passer à `WebViewBuilder`.
///
/// Échoue s'il n'y a pas de driver compatible ou si les handles sont invalides.
pub fn create_rendering_context(
    display_handle: DisplayHandle<'_>,
    window_handle: WindowHandle<'_>,
    size: PhysicalSize<u32>,
) -> Result<Rc<WindowRenderingContext>, Box<dyn Error>> {
    let rendering_context = WindowRenderingContext::new(display_handle, window_handle, size)
        .map_err(|e| format!("WindowRenderingContext indisponible ({e:?}), vérifiez vos drivers GPU"))?;

    rendering_context
        .make_current()
        .map_err(|e| format!("Impossible de rendre le contexte OpenGL courant: {e:?}"))?;

    Ok(Rc::new(rendering_context))
}

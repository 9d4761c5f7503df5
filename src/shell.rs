//! Boucle d'événements Winit et cycle de vie du shell.
//!
//! ## Pattern "Two-Phase App"
//!
//! Winit 0.30 impose que les fenêtres soient créées dans `resumed()`, et
//! Servo a besoin d'un handle de fenêtre pour son contexte de rendu :
//!
//! ```text
//! App::Initial { waker, settings }  →  [resumed()]  →  App::Running(Rc<AppState>)
//! ```
//!
//! ## Flux Winit ↔ Servo
//!
//! ```text
//! Threads Servo ── wake() ──▶ EventLoopProxy::send_event(WakerEvent)
//!                                   │
//!                                   ▼
//!                  user_event() → servo.spin_event_loop()
//!                                   └─ WebViewDelegate (request_navigation, …)
//! ```
//!
//! Le webview occupe toute la fenêtre : pas de barre d'URL, le shell
//! présente le site comme une application.

use std::cell::{Cell, RefCell};
use std::error::Error;
use std::rc::Rc;

use euclid::Scale;
use servo::{InputEvent, WheelDelta, WheelEvent, WheelMode};
use servo::{MouseButton as ServoMouseButton, MouseButtonAction, MouseButtonEvent};
use servo::{MouseLeftViewportEvent, MouseMoveEvent};
use servo::{
    RenderingContext, Servo, ServoBuilder, WebView, WebViewBuilder, WindowRenderingContext,
};
use tracing::{error, info};
use url::Url;
use webrender_api::units::DevicePoint;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::window::Window;

use crate::config::Config;
use crate::external::{Navigator, SystemBrowser};
use crate::history::{BackAction, HistoryState};
use crate::preferences::build_servo_preferences;
use crate::rendering;
use crate::servo_glue::{Waker, WakerEvent};
use crate::tls::CertificatePolicy;

/// Pixels par ligne pour les molettes à crans.
const LINE_HEIGHT: f32 = 76.0;

/// Tout ce qu'il faut pour démarrer le shell, résolu avant la boucle.
#[derive(Debug, Clone)]
pub struct ShellSettings {
    pub config: Config,
    pub initial_url: Url,
    pub certificate_policy: CertificatePolicy,
}

// ─────────────────────────────────────────────────────────────────────────────
// AppState : état partagé entre Winit et Servo
// ─────────────────────────────────────────────────────────────────────────────

/// État de l'application, créé lors de `resumed()`.
///
/// Dans un `Rc` car Servo attend un `Rc<dyn WebViewDelegate>` ; tout vit
/// sur le thread principal.
pub struct AppState {
    pub window: Window,
    pub servo: Servo,
    pub rendering_context: Rc<WindowRenderingContext>,
    pub webviews: RefCell<Vec<WebView>>,
    /// Webviews auxiliaires (`target="_blank"`, `window.open`), jamais affichées.
    pub popups: RefCell<Vec<WebView>>,

    /// Position courante du curseur en device pixels.
    pub cursor_position: Cell<DevicePoint>,
    pub modifiers: Cell<ModifiersState>,

    /// Décision interne/externe pour chaque navigation.
    pub navigator: Navigator,
    pub history: HistoryState,
    pub current_url: RefCell<Option<Url>>,

    /// Titre de base de la fenêtre.
    pub title: String,
}

impl AppState {
    fn webview(&self) -> Option<WebView> {
        self.webviews.borrow().last().cloned()
    }

    pub fn is_popup(&self, webview: &WebView) -> bool {
        self.popups.borrow().iter().any(|p| p.id() == webview.id())
    }

    /// Libère notre handle ; Servo ferme le webview quand le dernier disparaît.
    pub fn close_popup(&self, webview: &WebView) {
        self.popups.borrow_mut().retain(|p| p.id() != webview.id());
    }

    /// Geste "retour" : une entrée en arrière si possible, sinon on quitte.
    pub fn go_back_or_exit(&self, event_loop: &ActiveEventLoop) {
        match self.history.back_action() {
            BackAction::StepBack => {
                if let Some(webview) = self.webview() {
                    webview.go_back(1);
                }
            }
            BackAction::Exit => {
                info!(
                    url = ?self.current_url.borrow().as_ref().map(Url::as_str),
                    "Historique vide, fermeture du shell"
                );
                event_loop.exit();
            }
        }
    }

    fn forward_input(&self, event: InputEvent) {
        if let Some(webview) = self.webview() {
            webview.notify_input_event(event);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App : enum deux phases
// ─────────────────────────────────────────────────────────────────────────────

pub enum App {
    Initial { waker: Waker, settings: ShellSettings },
    Running(Rc<AppState>),
}

impl App {
    pub fn new(event_loop: &EventLoop<WakerEvent>, settings: ShellSettings) -> Self {
        Self::Initial {
            waker: Waker::new(event_loop),
            settings,
        }
    }
}

/// Crée la fenêtre, Servo et le webview initial.
fn start(
    event_loop: &ActiveEventLoop,
    waker: Waker,
    settings: ShellSettings,
) -> Result<Rc<AppState>, Box<dyn Error>> {
    let ShellSettings {
        config,
        initial_url,
        certificate_policy,
    } = settings;

    // ── 1. Fenêtre ─────────────────────────────────────────────────────
    let display_handle = event_loop.display_handle()?;
    let window_attributes = Window::default_attributes()
        .with_title(config.general.window_title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    let window = event_loop.create_window(window_attributes)?;
    let window_handle = window.window_handle()?;

    // ── 2. Contexte de rendu ───────────────────────────────────────────
    let rendering_context =
        rendering::create_rendering_context(display_handle, window_handle, window.inner_size())?;

    // ── 3. Servo ───────────────────────────────────────────────────────
    let mut opts = servo::Opts::default();
    certificate_policy.apply(&mut opts);
    let servo = ServoBuilder::default()
        .opts(opts)
        .preferences(build_servo_preferences(&config.web, &config.servo))
        .event_loop_waker(Box::new(waker))
        .build();

    // ── 4. AppState ────────────────────────────────────────────────────
    let navigator = Navigator::new(config.navigation_policy(), Box::new(SystemBrowser));
    navigator.expect_initial_load(&initial_url);
    info!(
        url = %initial_url,
        internal_host = navigator.policy().internal_host(),
        host_match = ?navigator.policy().host_match(),
        "Démarrage du shell"
    );

    let app_state = Rc::new(AppState {
        window,
        servo,
        rendering_context,
        webviews: RefCell::new(Vec::new()),
        popups: RefCell::new(Vec::new()),
        cursor_position: Cell::new(DevicePoint::zero()),
        modifiers: Cell::new(ModifiersState::default()),
        navigator,
        history: HistoryState::new(),
        current_url: RefCell::new(None),
        title: config.general.window_title.clone(),
    });

    // ── 5. WebView initiale ────────────────────────────────────────────
    let scale_factor = if config.web.viewport_scaling {
        app_state.window.scale_factor() as f32
    } else {
        1.0
    };
    let webview = WebViewBuilder::new(
        &app_state.servo,
        app_state.rendering_context.clone() as Rc<dyn RenderingContext>,
    )
    .url(initial_url)
    .hidpi_scale_factor(Scale::new(scale_factor))
    .delegate(app_state.clone())
    .build();

    app_state.webviews.borrow_mut().push(webview);
    Ok(app_state)
}

// ─────────────────────────────────────────────────────────────────────────────
// ApplicationHandler : dispatch des événements Winit
// ─────────────────────────────────────────────────────────────────────────────

impl ApplicationHandler<WakerEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let (waker, settings) = match self {
            Self::Initial { waker, settings } => (waker.clone(), settings.clone()),
            Self::Running(_) => return,
        };

        match start(event_loop, waker, settings) {
            Ok(state) => *self = Self::Running(state),
            Err(error) => {
                error!(%error, "Impossible de démarrer le shell");
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, _event: WakerEvent) {
        if let Self::Running(state) = self {
            state.servo.spin_event_loop();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Self::Running(state) = self else {
            if let WindowEvent::CloseRequested = event {
                event_loop.exit();
            }
            return;
        };

        // Toujours faire tourner la boucle Servo en premier.
        state.servo.spin_event_loop();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => {
                if let Some(webview) = state.webview() {
                    webview.paint();
                }
                state.rendering_context.present();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(webview) = state.webview() {
                    webview.resize(new_size);
                }
            }

            WindowEvent::ModifiersChanged(new_modifiers) => {
                state.modifiers.set(new_modifiers.state());
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let (x, y, mode) = match delta {
                    MouseScrollDelta::LineDelta(dx, dy) => (
                        (dx * LINE_HEIGHT) as f64,
                        (dy * LINE_HEIGHT) as f64,
                        WheelMode::DeltaLine,
                    ),
                    MouseScrollDelta::PixelDelta(delta) => (delta.x, delta.y, WheelMode::DeltaPixel),
                };
                state.forward_input(InputEvent::Wheel(WheelEvent::new(
                    WheelDelta { x, y, z: 0.0, mode },
                    state.cursor_position.get().into(),
                )));
            }

            WindowEvent::CursorMoved { position, .. } => {
                let point = DevicePoint::new(position.x as f32, position.y as f32);
                state.cursor_position.set(point);
                state.forward_input(InputEvent::MouseMove(MouseMoveEvent::new(point.into())));
            }

            WindowEvent::CursorLeft { .. } => {
                state.forward_input(InputEvent::MouseLeftViewport(
                    MouseLeftViewportEvent::default(),
                ));
            }

            // Bouton "précédent" de la souris = geste retour.
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: WinitMouseButton::Back,
                ..
            } => {
                state.go_back_or_exit(event_loop);
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                let servo_button = match button {
                    WinitMouseButton::Left => ServoMouseButton::Left,
                    WinitMouseButton::Right => ServoMouseButton::Right,
                    WinitMouseButton::Middle => ServoMouseButton::Middle,
                    WinitMouseButton::Back => ServoMouseButton::Back,
                    WinitMouseButton::Forward => ServoMouseButton::Forward,
                    WinitMouseButton::Other(id) => ServoMouseButton::Other(id),
                };
                let action = match btn_state {
                    ElementState::Pressed => MouseButtonAction::Down,
                    ElementState::Released => MouseButtonAction::Up,
                };
                state.forward_input(InputEvent::MouseButton(MouseButtonEvent::new(
                    action,
                    servo_button,
                    state.cursor_position.get().into(),
                )));
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let mods = state.modifiers.get();

                if event.state == ElementState::Pressed {
                    // Alt+Left, touche "Précédent" : geste retour
                    let is_back = matches!(event.logical_key, Key::Named(NamedKey::BrowserBack))
                        || (mods.alt_key()
                            && matches!(event.logical_key, Key::Named(NamedKey::ArrowLeft)));
                    if is_back {
                        if !event.repeat {
                            state.go_back_or_exit(event_loop);
                        }
                        return;
                    }

                    // Alt+Right : avant
                    if mods.alt_key() && matches!(event.logical_key, Key::Named(NamedKey::ArrowRight))
                    {
                        if state.history.can_go_forward()
                            && let Some(webview) = state.webview()
                        {
                            webview.go_forward(1);
                        }
                        return;
                    }

                    // Ctrl+R, F5 : recharger
                    let is_reload = matches!(event.logical_key, Key::Named(NamedKey::F5))
                        || (mods.control_key()
                            && matches!(&event.logical_key, Key::Character(c) if c.eq_ignore_ascii_case("r")));
                    if is_reload {
                        if let Some(webview) = state.webview() {
                            webview.reload();
                        }
                        return;
                    }
                }

                let keyboard_event = crate::keyutils::keyboard_event_from_winit(&event, mods);
                state.forward_input(InputEvent::Keyboard(keyboard_event));
            }

            _ => (),
        }
    }
}

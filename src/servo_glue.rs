//! Couche d'intégration entre Servo et le shell.
//!
//! 1. **[`Waker`] / [`WakerEvent`]** : le pont `Send + Sync` entre les threads
//!    internes de Servo et le thread principal Winit.
//!
//! 2. **[`WebViewDelegate`] pour [`AppState`]** : callbacks par webview. C'est
//!    ici que chaque demande de navigation passe par le [`Navigator`], seul
//!    point de décision interne/externe.
//!
//! [`Navigator`]: crate::external::Navigator

use std::rc::Rc;

use servo::{NavigationRequest, RenderingContext, WebView, WebViewBuilder, WebViewDelegate};
use tracing::{debug, warn};
use url::Url;
use winit::event_loop::{EventLoop, EventLoopProxy};

use crate::external::PopupRoute;
use crate::policy::NavigationDecision;
use crate::shell::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Waker : pont Servo → Winit
// ─────────────────────────────────────────────────────────────────────────────

/// Événement marqueur envoyé à travers le `EventLoopProxy` de Winit.
///
/// La boucle le reçoit dans `user_event()` et appelle
/// `servo.spin_event_loop()` en réponse.
#[derive(Debug)]
pub struct WakerEvent;

/// Réveille la boucle Winit depuis n'importe quel thread Servo.
///
/// `Clone + Send + Sync` comme `EventLoopProxy`, ce qu'exige
/// `EventLoopWaker: 'static + Send + Sync`.
#[derive(Clone)]
pub struct Waker(EventLoopProxy<WakerEvent>);

impl Waker {
    pub fn new(event_loop: &EventLoop<WakerEvent>) -> Self {
        Self(event_loop.create_proxy())
    }
}

impl embedder_traits::EventLoopWaker for Waker {
    fn clone_box(&self) -> Box<dyn embedder_traits::EventLoopWaker> {
        Box::new(Self(self.0.clone()))
    }

    fn wake(&self) {
        if let Err(error) = self.0.send_event(WakerEvent) {
            warn!(?error, "Échec du réveil de la boucle d'événements Winit");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WebViewDelegate : callbacks Servo → shell
// ─────────────────────────────────────────────────────────────────────────────

/// Exécute un callback Servo en rattrapant une éventuelle panique (par
/// exemple un `RefCell` déjà emprunté), qui ne doit pas traverser la
/// frontière Servo.
fn guarded<R>(callback: impl FnOnce() -> R) -> Option<R> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(callback)) {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Panique rattrapée dans un callback Servo");
            None
        }
    }
}

impl AppState {
    /// Applique la décision prise pour un popup : il est fermé dès qu'il a
    /// une vraie URL, chargée dans le webview principal si elle est interne.
    fn dispose_popup(&self, popup: &WebView, url: &Url) -> PopupRoute {
        let route = self.navigator.route_popup(url.as_str());
        if route != PopupRoute::Pending {
            self.close_popup(popup);
        }
        if route == PopupRoute::LoadInMain
            && let Some(main) = self.webviews.borrow().last()
        {
            main.load(url.clone());
        }
        route
    }
}

/// Les méthodes du trait ont toutes une implémentation par défaut ; on
/// n'override que celles dont le shell a besoin. Chaque callback passe par
/// [`guarded`].
impl WebViewDelegate for AppState {
    fn notify_new_frame_ready(&self, _webview: WebView) {
        guarded(|| self.window.request_redraw());
    }

    fn notify_url_changed(&self, webview: WebView, url: Url) {
        debug!(%url, "URL changée");
        guarded(|| {
            if self.is_popup(&webview) {
                self.dispose_popup(&webview, &url);
                return;
            }
            self.navigator.settle_initial_load();
            *self.current_url.borrow_mut() = Some(url);
        });
    }

    fn notify_page_title_changed(&self, webview: WebView, title: Option<String>) {
        guarded(|| {
            if self.is_popup(&webview) {
                return;
            }
            let title = match title {
                Some(title) if !title.trim().is_empty() => format!("{} — {}", self.title, title),
                _ => self.title.clone(),
            };
            self.window.set_title(&title);
        });
    }

    fn notify_history_changed(&self, webview: WebView, entries: Vec<Url>, current: usize) {
        guarded(|| {
            if self.is_popup(&webview) {
                return;
            }
            self.history.update(entries.len(), current);
            debug!(
                entries = entries.len(),
                current,
                can_go_back = self.history.can_go_back(),
                "Historique mis à jour"
            );
        });
    }

    /// `target="_blank"` et `window.open` : le popup reçoit le même
    /// delegate, sa navigation passe donc aussi par le `Navigator`. Il
    /// n'est jamais affiché.
    fn request_open_auxiliary_webview(&self, parent_webview: WebView) -> Option<WebView> {
        guarded(|| {
            let popup = WebViewBuilder::new_auxiliary(
                &self.servo,
                self.rendering_context.clone() as Rc<dyn RenderingContext>,
            )
            .delegate(parent_webview.delegate())
            .build();
            self.popups.borrow_mut().push(popup.clone());
            debug!(popups = self.popups.borrow().len(), "Popup ouvert");
            popup
        })
    }

    /// Point de décision unique : chaque lien cliqué ou redirection passe
    /// par le `Navigator`, qui a déjà ouvert l'URL à l'extérieur quand il
    /// répond `DivertExternal`.
    fn request_navigation(&self, webview: WebView, navigation_request: NavigationRequest) {
        let url = navigation_request.url.clone();

        let allow = guarded(|| {
            if self.is_popup(&webview) {
                self.dispose_popup(&webview, &url) == PopupRoute::Pending
            } else {
                self.navigator.route(url.as_str()) == NavigationDecision::KeepInternal
            }
        })
        .unwrap_or(true);

        if allow {
            navigation_request.allow();
        } else {
            navigation_request.deny();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_returns_value() {
        assert_eq!(guarded(|| 42), Some(42));
    }

    #[test]
    fn test_guarded_swallows_panic() {
        let cell = std::cell::RefCell::new(0);
        let result = guarded(|| {
            let _first = cell.borrow_mut();
            let _second = cell.borrow_mut();
        });
        assert!(result.is_none());
    }
}

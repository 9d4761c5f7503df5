//! # webshell — un site web dans une fenêtre native
//!
//! Shell mono-fenêtre construit sur Servo : un webview plein écran pointé
//! sur une URL configurée. Les liens qui sortent de l'hôte configuré
//! s'ouvrent dans le navigateur du système au lieu du shell.
//!
//! ## Architecture des modules
//!
//! - [`policy`] : décision pure interne/externe pour une URL.
//! - [`external`] : ouverture des URLs détournées et [`external::Navigator`],
//!   seul point de décision appelé par Servo.
//! - [`history`] : suivi de l'historique et geste "retour".
//! - [`tls`] : politique pour les erreurs de certificat (opt-in).
//! - [`config`] : configuration TOML.
//! - [`preferences`] : préférences Servo dérivées de la configuration.
//! - [`shell`] : boucle Winit, cycle de vie de la fenêtre et du webview.
//! - [`servo_glue`] : `Waker` et `WebViewDelegate`.
//! - [`rendering`], [`resources`], [`keyutils`] : plomberie Servo/Winit.

pub mod config;
pub mod external;
pub mod history;
pub mod keyutils;
pub mod policy;
pub mod preferences;
pub mod rendering;
pub mod resources;
pub mod servo_glue;
pub mod shell;
pub mod tls;

//! Point d'entrée de webshell.
//!
//! Usage :
//!   webshell [URL] [--ignore-certificate-errors]
//!
//! Exemples :
//!   cargo run                                → page de config.toml (https://example.com)
//!   cargo run -- https://servo.org           → charge servo.org
//!   cargo run -- servo.org                   → ajoute https:// automatiquement
//!   cargo run -- --ignore-certificate-errors → ignore les erreurs de certificat

use std::env;
use std::error::Error;

use url::Url;
use winit::event_loop::EventLoop;

use webshell::config::Config;
use webshell::shell::{App, ShellSettings};
use webshell::tls::CertificatePolicy;

const IGNORE_CERT_FLAG: &str = "--ignore-certificate-errors";

fn main() -> Result<(), Box<dyn Error>> {
    // ── 1. Provider crypto TLS ─────────────────────────────────────────
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| "Échec de l'installation du provider crypto rustls")?;

    // ── 2. Logging / Tracing ───────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    #[cfg(debug_assertions)]
    tracing::warn!(
        "Running in DEBUG mode — pages will load very slowly. Use `cargo run --release` for normal speed."
    );

    // ── 3. Configuration + arguments ───────────────────────────────────
    let config = Config::load();
    let args: Vec<String> = env::args().skip(1).collect();

    let url_arg = args.iter().find(|arg| !arg.starts_with("--"));
    let initial_url = parse_url(
        url_arg
            .map(String::as_str)
            .unwrap_or(&config.general.initial_url),
    )?;

    let certificate_policy = if args.iter().any(|arg| arg == IGNORE_CERT_FLAG) {
        CertificatePolicy::Proceed
    } else {
        config.certificate_policy()
    };

    // ── 4. Lecteur de ressources Servo ─────────────────────────────────
    webshell::resources::init()?;

    // ── 5. Boucle d'événements Winit ───────────────────────────────────
    let event_loop = EventLoop::with_user_event().build()?;

    let mut app = App::new(
        &event_loop,
        ShellSettings {
            config,
            initial_url,
            certificate_policy,
        },
    );

    Ok(event_loop.run_app(&mut app)?)
}

/// Parse une URL ; sans schéma, on ajoute "https://".
fn parse_url(input: &str) -> Result<Url, Box<dyn Error>> {
    if let Ok(url) = Url::parse(input) {
        return Ok(url);
    }
    Url::parse(&format!("https://{input}")).map_err(|e| format!("URL invalide '{input}': {e}").into())
}

//! Lecteur de ressources Servo.
//!
//! Servo lit ses préférences, certificats et listes (domaines publics, GATT)
//! depuis un dossier `resources/` fourni par l'embedder. Ce module le
//! localise une seule fois, dans cet ordre :
//!
//! 1. Variable d'environnement `SERVO_RESOURCES_PATH`
//! 2. À côté de l'exécutable (`<exe_dir>/resources/`)
//! 3. Racine du projet cargo quand l'exécutable est sous `target/`
//! 4. Répertoire courant (`./resources/`)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::{env, fs};

use servo::resources::{self, Resource};
use tracing::info;

static RESOURCES_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Enregistre le lecteur de ressources auprès de Servo.
///
/// Doit être appelé avant `ServoBuilder::build()`. Échoue si aucun dossier
/// `resources/` n'est trouvé.
pub fn init() -> Result<(), String> {
    let dir = resources_dir().ok_or_else(|| {
        "Dossier 'resources/' de Servo introuvable. Définissez SERVO_RESOURCES_PATH \
         ou placez le dossier à côté de l'exécutable."
            .to_string()
    })?;
    info!(path = %dir.display(), "Ressources Servo");
    resources::set(Box::new(ResourceReader { dir }));
    Ok(())
}

struct ResourceReader {
    dir: PathBuf,
}

impl resources::ResourceReaderMethods for ResourceReader {
    // Le trait ne permet pas de remonter une erreur : une ressource
    // manquante est fatale pour Servo de toute façon.
    fn read(&self, file: Resource) -> Vec<u8> {
        let path = contained_path(&self.dir, file.filename())
            .unwrap_or_else(|e| panic!("Ressource Servo {:?} refusée: {e}", file.filename()));

        fs::read(&path).unwrap_or_else(|e| {
            panic!(
                "Impossible de lire la ressource Servo {:?} ({}): {e}",
                file.filename(),
                path.display()
            )
        })
    }

    fn sandbox_access_files_dirs(&self) -> Vec<PathBuf> {
        vec![self.dir.clone()]
    }

    fn sandbox_access_files(&self) -> Vec<PathBuf> {
        vec![]
    }
}

/// Résout `name` sous `base` et vérifie que le chemin canonique y reste.
fn contained_path(base: &Path, name: &str) -> Result<PathBuf, String> {
    let base = base.canonicalize().map_err(|e| e.to_string())?;
    let path = base.join(name).canonicalize().map_err(|e| e.to_string())?;
    if !path.starts_with(&base) {
        return Err(format!(
            "chemin hors de {} ({})",
            base.display(),
            path.display()
        ));
    }
    Ok(path)
}

fn resources_dir() -> Option<PathBuf> {
    RESOURCES_DIR.get_or_init(find_resources_dir).clone()
}

fn find_resources_dir() -> Option<PathBuf> {
    if let Ok(path) = env::var("SERVO_RESOURCES_PATH") {
        let path = PathBuf::from(path);
        if path.is_dir() {
            return Some(path);
        }
    }

    if let Ok(exe) = env::current_exe()
        && let Ok(exe) = exe.canonicalize()
        && let Some(exe_dir) = exe.parent()
    {
        let path = exe_dir.join("resources");
        if path.is_dir() {
            return Some(path);
        }

        // target/{debug,release}/webshell → <projet>/resources
        if let Some(target_dir) = exe_dir.parent()
            && target_dir.file_name().is_some_and(|n| n == "target")
            && let Some(project_root) = target_dir.parent()
        {
            let path = project_root.join("resources");
            if path.is_dir() {
                return Some(path);
            }
        }
    }

    let path = env::current_dir().ok()?.join("resources");
    path.is_dir().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("webshell-res-{tag}-{}", std::process::id()));
        fs::create_dir_all(dir.join("resources")).unwrap();
        dir
    }

    #[test]
    fn test_contained_path_accepts_file_inside() {
        let root = scratch_dir("inside");
        let base = root.join("resources");
        fs::write(base.join("prefs.json"), "{}").unwrap();

        let path = contained_path(&base, "prefs.json").unwrap();
        assert!(path.ends_with("prefs.json"));
        assert!(path.is_absolute());

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_contained_path_rejects_traversal() {
        let root = scratch_dir("traversal");
        let base = root.join("resources");
        fs::write(root.join("secret.txt"), "nope").unwrap();

        let err = contained_path(&base, "../secret.txt").unwrap_err();
        assert!(err.contains("hors de"));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_contained_path_rejects_missing_file() {
        let root = scratch_dir("missing");
        assert!(contained_path(&root.join("resources"), "absent.json").is_err());
        fs::remove_dir_all(&root).unwrap();
    }
}

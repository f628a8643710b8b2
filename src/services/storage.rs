//! Almacenamiento de imágenes de inspección
//!
//! Colaborador de blob storage: guarda el archivo subido bajo el directorio
//! de uploads y devuelve una URL recuperable. El resto del sistema trata
//! esa URL como un string opaco; el directorio se sirve con `ServeDir`.

use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

/// Extensiones de imagen aceptadas para los slots de fotos
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Clone)]
pub struct StorageService {
    upload_dir: PathBuf,
}

impl StorageService {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Guardar bytes subidos y devolver la URL pública (`/uploads/...`).
    ///
    /// El nombre final es un UUID: el nombre original solo aporta la
    /// extensión, nunca llega al filesystem.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> AppResult<String> {
        if bytes.is_empty() {
            return Err(AppError::BadRequest("El archivo está vacío".to_string()));
        }

        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| {
                AppError::BadRequest("El archivo no tiene extensión".to_string())
            })?;

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Extensión '{}' no permitida (se aceptan: {})",
                extension,
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }

        fs::create_dir_all(&self.upload_dir).await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.upload_dir.join(&file_name);
        fs::write(&path, bytes).await?;

        Ok(format!("/uploads/{}", file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_rejects_empty_files() {
        let service = StorageService::new(std::env::temp_dir().join("fleet_booking_test"));
        let result = service.save("front.jpg", &[]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn save_rejects_unknown_extensions() {
        let service = StorageService::new(std::env::temp_dir().join("fleet_booking_test"));
        let result = service.save("script.exe", b"data").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn save_returns_uploads_url() {
        let service = StorageService::new(std::env::temp_dir().join("fleet_booking_test"));
        let url = service.save("front.JPG", b"fake image bytes").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".jpg"));
    }
}

use std::path::Path;

use bujo_core::ocr::{OcrClient, ScanUpload};

use crate::commands::common::api_client;
use crate::error::CliError;

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub async fn run_scan(
    image_path: &Path,
    page: u32,
    thread: Option<String>,
    api_url: Option<&str>,
) -> Result<(), CliError> {
    let mime_type = image_mime_type(image_path)?;
    let bytes = std::fs::read(image_path)?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(CliError::ImageTooLarge);
    }

    let upload = ScanUpload {
        file_name: image_path
            .file_name()
            .map_or_else(|| "page.jpg".to_string(), |name| name.to_string_lossy().into_owned()),
        mime_type: mime_type.to_string(),
        bytes,
        page_number: page,
        thread_id: thread,
    };

    let ocr = OcrClient::new(api_client(api_url)?);
    let result = ocr.scan_page(&upload).await?;

    if let Some(page_id) = &result.journal_page_id {
        println!("Page stored as {page_id}");
    }
    if let Some(message) = &result.message {
        println!("{message}");
    }
    match &result.text {
        Some(text) => println!("{text}"),
        None => println!("(no text extracted)"),
    }
    Ok(())
}

pub async fn run_extract(page_id: Option<&str>, api_url: Option<&str>) -> Result<(), CliError> {
    let ocr = OcrClient::new(api_client(api_url)?);
    let data = ocr.extracted_data(page_id).await?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

fn image_mime_type(path: &Path) -> Result<&'static str, CliError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    match extension.as_deref() {
        Some("jpg" | "jpeg") => Ok("image/jpeg"),
        Some("png") => Ok("image/png"),
        Some("heic") => Ok("image/heic"),
        Some("heif") => Ok("image/heif"),
        _ => Err(CliError::UnsupportedImageType),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn accepts_known_image_extensions() {
        assert_eq!(
            image_mime_type(&PathBuf::from("page.JPG")).unwrap(),
            "image/jpeg"
        );
        assert_eq!(
            image_mime_type(&PathBuf::from("page.png")).unwrap(),
            "image/png"
        );
        assert_eq!(
            image_mime_type(&PathBuf::from("page.heic")).unwrap(),
            "image/heic"
        );
    }

    #[test]
    fn rejects_unknown_extensions() {
        assert!(matches!(
            image_mime_type(&PathBuf::from("page.gif")),
            Err(CliError::UnsupportedImageType)
        ));
        assert!(matches!(
            image_mime_type(&PathBuf::from("page")),
            Err(CliError::UnsupportedImageType)
        ));
    }
}

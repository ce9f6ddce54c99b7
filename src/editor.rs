//! The editing state: current buffer, pristine original, and history.

use crate::error::EditorError;
use crate::history::History;
use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};

struct Loaded {
    current: RgbImage,
    original: RgbImage,
    source: Option<PathBuf>,
}

/// Owns the full-resolution image and its undo/redo snapshots.
///
/// Every commit copies the buffer onto the history before mutating it, so
/// each snapshot is an independent image that is never touched again.
#[derive(Default)]
pub struct Editor {
    loaded: Option<Loaded>,
    history: History<RgbImage>,
    max_history: Option<usize>,
}

impl Editor {
    pub fn new(max_history: Option<usize>) -> Self {
        Self {
            loaded: None,
            history: History::with_limit(max_history),
            max_history,
        }
    }

    /// Decode `path` and make it the current and original image.
    /// On failure the previous state is kept.
    pub fn load(&mut self, path: &Path) -> Result<(), EditorError> {
        let decoded = Self::decode(path).map_err(|source| EditorError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let image = decoded.to_rgb8();
        log::info!(
            "Loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        self.replace(image, Some(path.to_path_buf()));
        Ok(())
    }

    /// Decode by file content, falling back to the extension when the bytes
    /// are not recognised.
    fn decode(path: &Path) -> Result<image::DynamicImage, image::ImageError> {
        image::ImageReader::open(path)
            .map_err(image::ImageError::IoError)?
            .with_guessed_format()
            .map_err(image::ImageError::IoError)?
            .decode()
    }

    pub fn load_image(&mut self, image: RgbImage) {
        self.replace(image, None);
    }

    fn replace(&mut self, image: RgbImage, source: Option<PathBuf>) {
        self.loaded = Some(Loaded {
            original: image.clone(),
            current: image,
            source,
        });
        self.history = History::with_limit(self.max_history);
    }

    /// Snapshot the buffer, clear redo, then apply `mutation`.
    /// Returns false when no image is loaded.
    pub fn commit(&mut self, mutation: impl FnOnce(&mut RgbImage)) -> bool {
        let Some(loaded) = self.loaded.as_mut() else {
            return false;
        };
        self.history.commit(loaded.current.clone());
        mutation(&mut loaded.current);
        log::debug!(
            "Committed edit, history depth {}",
            self.history.undo_len()
        );
        true
    }

    pub fn undo(&mut self) -> bool {
        let Some(loaded) = self.loaded.as_mut() else {
            return false;
        };
        let undone = self.history.undo(&mut loaded.current);
        if undone {
            log::debug!("Undo, {} left", self.history.undo_len());
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let Some(loaded) = self.loaded.as_mut() else {
            return false;
        };
        let redone = self.history.redo(&mut loaded.current);
        if redone {
            log::debug!("Redo, {} left", self.history.redo_len());
        }
        redone
    }

    /// Back to the image as loaded; both stacks are cleared.
    pub fn reset(&mut self) -> bool {
        let Some(loaded) = self.loaded.as_mut() else {
            return false;
        };
        loaded.current = loaded.original.clone();
        self.history.clear();
        log::info!("Reset to original image");
        true
    }

    /// Encode the current buffer in the format implied by the extension.
    /// Returns the path actually written (`.png` is added when missing).
    pub fn save(&self, path: &Path) -> Result<PathBuf, EditorError> {
        let loaded = self.loaded.as_ref().ok_or(EditorError::NoImage)?;
        let path = with_default_extension(path);
        let format = ImageFormat::from_path(&path).map_err(|source| EditorError::Encode {
            path: path.clone(),
            source,
        })?;
        loaded
            .current
            .save_with_format(&path, format)
            .map_err(|source| match source {
                image::ImageError::IoError(source) => EditorError::Io {
                    path: path.clone(),
                    source,
                },
                source => EditorError::Encode {
                    path: path.clone(),
                    source,
                },
            })?;
        log::info!("Saved {}", path.display());
        Ok(path)
    }

    pub fn image(&self) -> Option<&RgbImage> {
        self.loaded.as_ref().map(|l| &l.current)
    }

    pub fn original(&self) -> Option<&RgbImage> {
        self.loaded.as_ref().map(|l| &l.original)
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.loaded.as_ref().and_then(|l| l.source.as_deref())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_len(&self) -> usize {
        self.history.undo_len()
    }

    pub fn redo_len(&self) -> usize {
        self.history.redo_len()
    }
}

fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]))
    }

    fn paint(x: u32, y: u32) -> impl FnOnce(&mut RgbImage) {
        move |img: &mut RgbImage| img.put_pixel(x, y, Rgb([255, 0, 0]))
    }

    fn loaded_editor() -> Editor {
        let mut editor = Editor::default();
        editor.load_image(gradient(16, 8));
        editor
    }

    #[test]
    fn operations_without_image_are_noops() {
        let mut editor = Editor::default();
        assert!(!editor.commit(paint(0, 0)));
        assert!(!editor.undo());
        assert!(!editor.redo());
        assert!(!editor.reset());
        assert!(editor.image().is_none());
        assert!(matches!(
            editor.save(Path::new("out.png")),
            Err(EditorError::NoImage)
        ));
    }

    #[test]
    fn n_undos_restore_original() {
        let mut editor = loaded_editor();
        for i in 0..5 {
            assert!(editor.commit(paint(i, i)));
        }
        assert_ne!(editor.image(), editor.original());
        for _ in 0..5 {
            assert!(editor.undo());
        }
        assert_eq!(editor.image(), editor.original());
        assert!(!editor.undo());
        assert_eq!(editor.redo_len(), 5);
    }

    #[test]
    fn undo_then_redo_restores_state() {
        let mut editor = loaded_editor();
        editor.commit(paint(1, 1));
        editor.commit(paint(2, 2));
        let before = editor.image().cloned();

        assert!(editor.undo());
        assert_ne!(editor.image().cloned(), before);
        assert!(editor.redo());
        assert_eq!(editor.image().cloned(), before);
        assert_eq!((editor.undo_len(), editor.redo_len()), (2, 0));
    }

    #[test]
    fn commit_after_undo_clears_redo() {
        let mut editor = loaded_editor();
        editor.commit(paint(1, 1));
        editor.commit(paint(2, 2));
        editor.undo();
        editor.undo();
        assert!(editor.can_redo());

        editor.commit(paint(3, 3));
        assert!(!editor.can_redo());
        let after = editor.image().cloned();
        assert!(!editor.redo());
        assert_eq!(editor.image().cloned(), after);
    }

    #[test]
    fn undo_with_empty_history_changes_nothing() {
        let mut editor = loaded_editor();
        let before = editor.image().cloned();
        assert!(!editor.undo());
        assert_eq!(editor.image().cloned(), before);
        assert_eq!((editor.undo_len(), editor.redo_len()), (0, 0));
    }

    #[test]
    fn reset_returns_original_at_any_depth() {
        let mut editor = loaded_editor();
        for i in 0..4 {
            editor.commit(paint(i, 0));
        }
        editor.undo();
        assert!(editor.reset());
        assert_eq!(editor.image(), editor.original());
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
    }

    #[test]
    fn history_limit_is_honoured() {
        let mut editor = Editor::new(Some(2));
        editor.load_image(gradient(4, 4));
        for i in 0..4 {
            editor.commit(paint(i, i));
        }
        assert_eq!(editor.undo_len(), 2);
    }

    #[test]
    fn load_clears_history() {
        let mut editor = loaded_editor();
        editor.commit(paint(0, 0));
        editor.undo();
        editor.commit(paint(1, 1));
        editor.load_image(gradient(4, 4));
        assert_eq!((editor.undo_len(), editor.redo_len()), (0, 0));
        assert_eq!(editor.image().map(|i| i.dimensions()), Some((4, 4)));
    }

    #[test]
    fn save_and_reload_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = loaded_editor();
        editor.commit(paint(3, 3));

        let written = editor.save(&dir.path().join("annotated")).unwrap();
        assert_eq!(written.extension().and_then(|e| e.to_str()), Some("png"));

        let mut reloaded = Editor::default();
        reloaded.load(&written).unwrap();
        assert_eq!(reloaded.image(), editor.image());
        assert_eq!(reloaded.source_path(), Some(written.as_path()));
    }

    #[test]
    fn save_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let editor = loaded_editor();
        let written = editor.save(&dir.path().join("out.jpg")).unwrap();
        assert!(written.exists());
    }

    #[test]
    fn load_detects_format_from_content() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg = loaded_editor().save(&dir.path().join("photo.jpg")).unwrap();
        let misnamed = dir.path().join("photo.png");
        std::fs::copy(&jpeg, &misnamed).unwrap();

        let mut editor = Editor::default();
        editor.load(&misnamed).unwrap();
        assert_eq!(editor.image().map(|i| i.dimensions()), Some((16, 8)));
        assert_eq!(editor.source_path(), Some(misnamed.as_path()));
    }

    #[test]
    fn decode_failure_keeps_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.png");
        std::fs::write(&bogus, b"not an image").unwrap();

        let mut editor = loaded_editor();
        editor.commit(paint(0, 0));
        let before = editor.image().cloned();

        let err = editor.load(&bogus).unwrap_err();
        assert!(matches!(err, EditorError::Decode { .. }));
        assert_eq!(editor.image().cloned(), before);
        assert_eq!(editor.undo_len(), 1);
    }

    #[test]
    fn unknown_extension_is_an_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let editor = loaded_editor();
        let err = editor.save(&dir.path().join("out.notaformat")).unwrap_err();
        assert!(matches!(err, EditorError::Encode { .. }));
    }

    #[test]
    fn write_failure_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let editor = loaded_editor();
        let err = editor
            .save(&dir.path().join("missing-dir").join("out.png"))
            .unwrap_err();
        assert!(matches!(err, EditorError::Io { .. }));
    }
}

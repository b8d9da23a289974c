use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::constants;

/// Lists video files in `dir`, sorted by name.
pub fn scan_videos(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_video_extension(path))
        .collect();

    files.sort();
    Ok(files)
}

pub fn has_video_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    let ext = ext.to_ascii_lowercase();
    constants::VIDEO_EXTENSIONS
        .iter()
        .any(|allowed| *allowed == ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(has_video_extension(Path::new("clip.mp4")));
        assert!(has_video_extension(Path::new("CLIP.MP4")));
        assert!(!has_video_extension(Path::new("clip.avi")));
        assert!(!has_video_extension(Path::new("clip")));
        assert!(!has_video_extension(Path::new(".mp4/dir_name")));
    }

    #[test]
    fn scan_finds_only_videos() {
        let tmp_dir = std::env::temp_dir().join("pixelizer_scan_test");
        std::fs::create_dir_all(&tmp_dir).unwrap();
        std::fs::write(tmp_dir.join("b.mp4"), b"x").unwrap();
        std::fs::write(tmp_dir.join("a.mp4"), b"x").unwrap();
        std::fs::write(tmp_dir.join("notes.txt"), b"x").unwrap();

        let files = scan_videos(&tmp_dir).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.mp4", "b.mp4"]);
    }
}

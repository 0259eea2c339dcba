//! Image assets, read from a directory at startup.
//!
//! # Assets
//!
//! The directory must contain:
//! - one PNG per piece, named `<color>_<kind>.png` (`w_pawn.png` … `b_king.png`)
//! - a board background, `background.png` or `background.jpg`
//!
//! and may contain `icon.png`, used as the window icon.
//!
//! Everything is decoded to RGBA once. Scaling to the tile size happens on
//! the GPU when a frame is drawn.
//!
//! # Usage
//!
//! ```ignore
//! use chess_board::assets::Assets;
//! use chess_board::game_repr::{Color, Piece, PieceKind};
//!
//! let assets = Assets::load("assets")?;
//! let king = assets.glyph(Piece::new(PieceKind::King, Color::White));
//! ```

use crate::game_repr::{Color, Piece};
use image::RgbaImage;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Accepted background file names, in lookup order.
const BACKGROUND_FILES: [&str; 2] = ["background.png", "background.jpg"];

const ICON_FILE: &str = "icon.png";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("missing asset {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("asset {} has no pixels", .0.display())]
    Empty(PathBuf),
}

/// Decoded images for every piece, the background and the optional icon.
pub struct Assets {
    /// Indexed by [`Piece::index`].
    glyphs: Vec<RgbaImage>,
    background: RgbaImage,
    icon: Option<RgbaImage>,
}

impl Assets {
    /// Load every asset from `dir`.
    ///
    /// # Errors
    ///
    /// Any missing, undecodable or empty glyph or background. A bad icon is
    /// only logged.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, AssetError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(AssetError::MissingDirectory(dir.to_path_buf()));
        }

        let glyphs = Piece::all()
            .map(|piece| load_image(&dir.join(format!("{}.png", Self::glyph_file_stem(piece)))))
            .collect::<Result<Vec<_>, _>>()?;

        let background_path = BACKGROUND_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| AssetError::Missing(dir.join(BACKGROUND_FILES[0])))?;
        let background = load_image(&background_path)?;

        let icon_path = dir.join(ICON_FILE);
        let icon = if icon_path.is_file() {
            match load_image(&icon_path) {
                Ok(icon) => Some(icon),
                Err(e) => {
                    warn!("Ignoring window icon: {e}");
                    None
                }
            }
        } else {
            warn!("No window icon at {}", icon_path.display());
            None
        };

        debug!("Loaded assets from {}", dir.display());

        Ok(Self {
            glyphs,
            background,
            icon,
        })
    }

    /// File name of a piece's glyph, without extension: `w_pawn`, `b_king`, …
    pub fn glyph_file_stem(piece: Piece) -> String {
        let prefix = match piece.color {
            Color::White => "w",
            Color::Black => "b",
        };
        format!("{prefix}_{}", piece.kind.name())
    }

    pub fn glyph(&self, piece: Piece) -> &RgbaImage {
        &self.glyphs[piece.index()]
    }

    pub fn background(&self) -> &RgbaImage {
        &self.background
    }

    pub fn icon(&self) -> Option<&RgbaImage> {
        self.icon.as_ref()
    }
}

fn load_image(path: &Path) -> Result<RgbaImage, AssetError> {
    if !path.is_file() {
        return Err(AssetError::Missing(path.to_path_buf()));
    }

    let image = image::open(path)
        .map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    if image.width() == 0 || image.height() == 0 {
        return Err(AssetError::Empty(path.to_path_buf()));
    }

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_repr::PieceKind;
    use image::{Rgb, RgbImage, Rgba};
    use std::fs;

    /// A fresh, empty directory unique to one test.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("chess_board_assets_{}_{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_glyphs(dir: &Path) {
        for piece in Piece::all() {
            let shade = (piece.index() * 20) as u8;
            RgbaImage::from_pixel(4, 4, Rgba([shade, shade, shade, 255]))
                .save(dir.join(format!("{}.png", Assets::glyph_file_stem(piece))))
                .unwrap();
        }
    }

    #[test]
    fn test_glyph_file_stems() {
        assert_eq!(
            Assets::glyph_file_stem(Piece::new(PieceKind::Pawn, Color::White)),
            "w_pawn"
        );
        assert_eq!(
            Assets::glyph_file_stem(Piece::new(PieceKind::King, Color::Black)),
            "b_king"
        );
    }

    #[test]
    fn test_load_complete_directory() {
        let dir = scratch_dir("complete");
        write_glyphs(&dir);
        RgbaImage::new(8, 8).save(dir.join("background.png")).unwrap();
        RgbaImage::new(2, 2).save(dir.join("icon.png")).unwrap();

        let assets = Assets::load(&dir).unwrap();

        let black_queen = Piece::new(PieceKind::Queen, Color::Black);
        let shade = (black_queen.index() * 20) as u8;
        assert_eq!(assets.glyph(black_queen).get_pixel(0, 0), &Rgba([shade, shade, shade, 255]));
        assert_eq!(assets.background().dimensions(), (8, 8));
        assert!(assets.icon().is_some());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_jpeg_background_and_no_icon() {
        let dir = scratch_dir("jpeg");
        write_glyphs(&dir);
        RgbImage::from_pixel(8, 8, Rgb([120, 80, 40]))
            .save(dir.join("background.jpg"))
            .unwrap();

        let assets = Assets::load(&dir).unwrap();

        assert_eq!(assets.background().dimensions(), (8, 8));
        assert!(assets.icon().is_none());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_glyph_is_fatal() {
        let dir = scratch_dir("missing_glyph");
        write_glyphs(&dir);
        RgbaImage::new(8, 8).save(dir.join("background.png")).unwrap();
        fs::remove_file(dir.join("b_knight.png")).unwrap();

        match Assets::load(&dir) {
            Err(AssetError::Missing(path)) => assert!(path.ends_with("b_knight.png")),
            other => panic!("expected a missing glyph, got {:?}", other.err()),
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_background_is_fatal() {
        let dir = scratch_dir("missing_background");
        write_glyphs(&dir);

        assert!(matches!(Assets::load(&dir), Err(AssetError::Missing(_))));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_corrupt_glyph_is_fatal() {
        let dir = scratch_dir("corrupt");
        write_glyphs(&dir);
        RgbaImage::new(8, 8).save(dir.join("background.png")).unwrap();
        fs::write(dir.join("w_rook.png"), b"not a png").unwrap();

        assert!(matches!(Assets::load(&dir), Err(AssetError::Decode { .. })));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_directory() {
        let dir = std::env::temp_dir().join("chess_board_assets_does_not_exist");
        assert!(matches!(
            Assets::load(&dir),
            Err(AssetError::MissingDirectory(_))
        ));
    }
}

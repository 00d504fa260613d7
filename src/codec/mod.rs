//! WebP encoding for captured screenshots.
//!
//! Converts the raw PNG capture to WebP using one of three backends:
//! `magick` or `ffmpeg` when available (lossy, fixed quality), or the
//! builtin `image`-crate encoder (lossless) as the no-dependency fallback.
//! The intermediate PNG never touches the output tree; only the encoded
//! file is written.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use image::ImageFormat;
use image::codecs::webp::WebPEncoder;

use crate::debug;
use crate::utils::exec::{Cmd, SILENT_FILTER};

/// Quality for lossy WebP output.
pub const WEBP_QUALITY: u8 = 90;

/// Conversion backend for WebP encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebpBackend {
    /// `image` crate encoder. Always available, lossless (quality ignored).
    Builtin,
    /// ImageMagick `magick` binary.
    Magick,
    /// `ffmpeg` with libwebp.
    Ffmpeg,
}

impl WebpBackend {
    /// Pick the best available backend: an external lossy encoder when one
    /// is on PATH, builtin lossless otherwise.
    pub fn detect() -> Self {
        if which::which("magick").is_ok() {
            return Self::Magick;
        }
        if which::which("ffmpeg").is_ok() {
            return Self::Ffmpeg;
        }
        debug!("codec"; "neither magick nor ffmpeg found, falling back to lossless builtin encoder");
        Self::Builtin
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Builtin => "builtin",
            Self::Magick => "magick",
            Self::Ffmpeg => "ffmpeg",
        }
    }
}

/// Encode a PNG capture to WebP at `dest`.
///
/// The parent directory must already exist; callers create it alongside
/// plan execution.
pub fn encode_webp(png: &[u8], dest: &Path, quality: u8, backend: WebpBackend) -> Result<()> {
    match backend {
        WebpBackend::Builtin => encode_builtin(png, dest),
        WebpBackend::Magick => encode_magick(png, dest, quality),
        WebpBackend::Ffmpeg => encode_ffmpeg(png, dest, quality),
    }
    .with_context(|| format!("WebP encoding ({}) failed for {}", backend.name(), dest.display()))
}

/// Encode using the `image` crate (lossless).
fn encode_builtin(png: &[u8], dest: &Path) -> Result<()> {
    let img = image::load_from_memory_with_format(png, ImageFormat::Png)
        .context("failed to decode capture as PNG")?;

    let file = File::create(dest)?;
    let writer = BufWriter::new(file);
    img.write_with_encoder(WebPEncoder::new_lossless(writer))?;
    Ok(())
}

/// Encode using ImageMagick.
fn encode_magick(png: &[u8], dest: &Path, quality: u8) -> Result<()> {
    let output = Cmd::new("magick")
        .args(["png:-", "-quality", &quality.to_string(), "webp:-"])
        .stdin(png)
        .filter(&SILENT_FILTER)
        .run()
        .context("ImageMagick conversion failed")?;

    fs::write(dest, output.stdout)?;
    Ok(())
}

/// Encode using FFmpeg.
fn encode_ffmpeg(png: &[u8], dest: &Path, quality: u8) -> Result<()> {
    let output = Cmd::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error"])
        .args(["-f", "image2pipe", "-i", "pipe:0"])
        .args(["-c:v", "libwebp", "-quality", &quality.to_string()])
        .args(["-f", "webp", "pipe:1"])
        .stdin(png)
        .run()
        .context("FFmpeg conversion failed")?;

    fs::write(dest, output.stdout)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 120, 200, 255]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_builtin_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("og-sample.webp");

        encode_webp(&sample_png(4, 4), &dest, WEBP_QUALITY, WebpBackend::Builtin).unwrap();

        let decoded = image::open(&dest).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 4);
    }

    #[test]
    fn test_builtin_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("og-bad.webp");

        assert!(encode_webp(b"not a png", &dest, WEBP_QUALITY, WebpBackend::Builtin).is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(WebpBackend::Builtin.name(), "builtin");
        assert_eq!(WebpBackend::Magick.name(), "magick");
        assert_eq!(WebpBackend::Ffmpeg.name(), "ffmpeg");
    }
}

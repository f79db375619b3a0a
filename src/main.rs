use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{error, info};

use raw_render_rs::logger;
use raw_render_rs::render_pipeline::{Adjustments, Bitmap, RenderPipeline};

fn main() -> Result<()> {
    logger::init();

    let mut args = std::env::args().skip(1);
    let input = PathBuf::from(args.next().unwrap_or_else(|| "input.arw".to_string()));
    let output = PathBuf::from(args.next().unwrap_or_else(|| "output.png".to_string()));
    let ev: f32 = args
        .next()
        .map(|v| v.parse())
        .transpose()
        .context("exposure must be a number of EV stops")?
        .unwrap_or(0.0);

    info!("Starting raw_render...");

    let adjustments = Adjustments {
        exposure_multiplier: 2f32.powf(ev),
        ..Adjustments::default()
    };
    let pipeline = RenderPipeline::new();

    info!(
        input = %input.display(),
        output = %output.display(),
        ev,
        "RAW render pipeline initialized"
    );

    let raw_data = std::fs::read(&input)
        .with_context(|| format!("reading {}", input.display()))?;

    match pipeline.render_preview(&raw_data, &adjustments) {
        Ok(bitmap) => {
            info!(width = bitmap.width, height = bitmap.height, "Render successful!");
            save_png(&bitmap, &output)?;
        }
        Err(e) => error!("Render failed: {}", e),
    }

    Ok(())
}

fn save_png(bitmap: &Bitmap, path: &Path) -> Result<()> {
    // Rows may carry stride padding; pack them before handing the buffer
    // to the encoder.
    let row_bytes = bitmap.width as usize * 4;
    let mut packed = Vec::with_capacity(row_bytes * bitmap.height as usize);
    for y in 0..bitmap.height as usize {
        let start = y * bitmap.stride;
        packed.extend_from_slice(&bitmap.data[start..start + row_bytes]);
    }

    let encoded = image::RgbaImage::from_raw(bitmap.width, bitmap.height, packed)
        .context("bitmap buffer size mismatch")?;
    encoded
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

//! mcfont Preview Example
//!
//! Renders a preview of a small custom font to `preview.png`:
//! - a generated glyph atlas and bitmap provider
//! - title, actionbar and chat text with format codes
//! - the matching `/title` and `/tellraw` commands (printed to console)
//!
//! Run with: cargo run -p mcfont --example render_preview [output.png]
//!
//! With `RUST_LOG=mcfont_render=debug` the font build logs every provider.

use mcfont::prelude::*;
use tracing_subscriber::EnvFilter;

/// A 5x7 block letter for every uppercase ASCII letter, laid out in one row
/// of 8x8 cells.
fn atlas() -> Vec<u8> {
    let letters = 26;
    let mut image = image::RgbaImage::new(8 * letters, 8);
    for cell in 0..letters {
        for y in 0..7 {
            for x in 0..5 {
                // Hollow boxes with a notch per letter so glyphs differ.
                let edge = x == 0 || x == 4 || y == 0 || y == 6;
                let notch = y == 3 && x == cell % 5;
                if edge || notch {
                    image.put_pixel(cell * 8 + x, y + 1, image::Rgba([255, 255, 255, 255]));
                }
            }
        }
    }

    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .expect("encode atlas");
    png
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let output = std::env::args().nth(1).unwrap_or_else(|| "preview.png".to_string());

    let catalog = StaticCatalog::default().with_asset("minecraft/textures/font/ascii.png", atlas());
    let mut store = MemoryBlobStore::new();
    store.write(
        "demo/font/blocky.json",
        serde_json::to_vec(&serde_json::json!({
            "providers": [
                {"type": "space", "advances": {" ": 4}},
                {
                    "type": "bitmap",
                    "file": "minecraft:font/ascii.png",
                    "ascent": 7,
                    "chars": ["ABCDEFGHIJKLMNOPQRSTUVWXYZ"]
                }
            ]
        }))?,
    );

    let mut config = PreviewConfig::default();
    config.scale = 2;
    config.set_base_file("demo/font/blocky.json", &store);
    config.set_location(PreviewLocation::Title, "\u{a7}6HELLO");
    config.set_location(PreviewLocation::Actionbar, "\u{a7}lBOLD \u{a7}r\u{a7}nLINE");
    config.set_location(PreviewLocation::Chat, "\u{a7}bCHAT\\nTWO LINES \u{a7}kXYZ");

    let cache = FontCache::new();
    let previewer = Previewer::new(AssetResolver::new(&catalog, &store), &cache);
    let image = previewer.preview(&config, &mut rand::thread_rng()).await?;
    image.save(&output)?;
    println!("Wrote {output}");

    for command in commands(&config, &store)? {
        println!("{command}");
    }
    Ok(())
}

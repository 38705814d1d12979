//! The in-game HUD drawn behind preview text.
//!
//! Sprites come from the vanilla `gui/sprites/hud` textures of the active
//! version. A sprite that cannot be loaded is left out.

use mcfont_core::{AssetCatalog, AssetResolver, BlobStore, HudStyle};
use rand::Rng;

use crate::font::round_half_up;
use crate::image_buffer::ImageBuffer;
use crate::surface::DrawSurface;
use crate::types::Rect;

const SPRITE_DIR: &str = "minecraft/textures/gui/sprites/hud";

/// HUD sprite images.
#[derive(Debug, Clone, Default)]
pub struct HudSprites {
    pub hotbar: Option<ImageBuffer>,
    pub selection: Option<ImageBuffer>,
    pub xp_background: Option<ImageBuffer>,
    pub xp_progress: Option<ImageBuffer>,
    pub heart_container: Option<ImageBuffer>,
    pub heart_full: Option<ImageBuffer>,
    pub heart_half: Option<ImageBuffer>,
    pub food_empty: Option<ImageBuffer>,
    pub food_full: Option<ImageBuffer>,
    pub food_half: Option<ImageBuffer>,
    pub armor_empty: Option<ImageBuffer>,
    pub armor_full: Option<ImageBuffer>,
    pub armor_half: Option<ImageBuffer>,
    pub crosshair: Option<ImageBuffer>,
}

impl HudSprites {
    /// Sprite names relative to the HUD sprite directory, in field order.
    pub const NAMES: [&'static str; 14] = [
        "hotbar",
        "hotbar_selection",
        "experience_bar_background",
        "experience_bar_progress",
        "heart/container",
        "heart/full",
        "heart/half",
        "food_empty",
        "food_full",
        "food_half",
        "armor_empty",
        "armor_full",
        "armor_half",
        "crosshair",
    ];

    /// Storage path of a sprite.
    pub fn path(name: &str) -> String {
        format!("{SPRITE_DIR}/{name}.png")
    }

    /// Build the sprite set from a per-path loader.
    pub fn from_fn(mut load: impl FnMut(&str) -> Option<ImageBuffer>) -> Self {
        let mut sprites = Self::NAMES.map(|name| load(&Self::path(name)));
        let mut take = |i: usize| sprites[i].take();
        Self {
            hotbar: take(0),
            selection: take(1),
            xp_background: take(2),
            xp_progress: take(3),
            heart_container: take(4),
            heart_full: take(5),
            heart_half: take(6),
            food_empty: take(7),
            food_full: take(8),
            food_half: take(9),
            armor_empty: take(10),
            armor_full: take(11),
            armor_half: take(12),
            crosshair: take(13),
        }
    }

    /// Load every sprite through `assets`.
    pub async fn load<C: AssetCatalog, B: BlobStore>(assets: AssetResolver<'_, C, B>) -> Self {
        let mut decoded = Vec::with_capacity(Self::NAMES.len());
        for name in Self::NAMES {
            let path = Self::path(name);
            let image = match assets.read(&path).await {
                Ok(bytes) => ImageBuffer::from_bytes(&bytes)
                    .inspect_err(|e| {
                        tracing::warn!(target: "mcfont_render::compositor", path = %path, error = %e, "bad HUD sprite");
                    })
                    .ok(),
                Err(e) => {
                    tracing::debug!(target: "mcfont_render::compositor", path = %path, error = %e, "HUD sprite unavailable");
                    None
                }
            };
            decoded.push((path, image));
        }
        Self::from_fn(|path| {
            decoded
                .iter_mut()
                .find(|(p, _)| p == path)
                .and_then(|(_, image)| image.take())
        })
    }
}

/// Player stats shown on the HUD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudStats {
    /// Selected hotbar slot, 0-8.
    pub selected_slot: u32,
    /// Filled experience bar pixels, 0-182.
    pub xp_progress: u32,
    /// Filled heart icons, in steps of 0.5. Anything from 10 up fills the
    /// whole row.
    pub hearts: f32,
    /// Filled food icons, counted like `hearts`.
    pub food: f32,
    /// Filled armor icons, or `None` to hide the armor row.
    pub armor: Option<f32>,
}

impl HudStats {
    /// Full stats, fifth slot, empty experience bar.
    pub fn barebones() -> Self {
        Self {
            selected_slot: 4,
            xp_progress: 0,
            hearts: 20.0,
            food: 20.0,
            armor: Some(20.0),
        }
    }

    /// Random stats. At least one heart is shown; armor shows half the time
    /// when non-zero.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let halves = |rng: &mut R| round_half_up(rng.r#gen::<f32>() * 20.0) / 2.0;

        let selected_slot = rng.gen_range(0..9);
        let xp_progress = round_half_up(rng.r#gen::<f32>() * 182.0) as u32;
        let hearts = halves(&mut *rng).max(1.0);
        let food = halves(&mut *rng);
        let armor = halves(&mut *rng);
        let show_armor = rng.r#gen::<f32>() <= 0.5 && armor > 0.0;

        Self {
            selected_slot,
            xp_progress,
            hearts,
            food,
            armor: show_armor.then_some(armor),
        }
    }

    /// Stats for a HUD style; `None` draws no HUD.
    pub fn for_style<R: Rng + ?Sized>(style: HudStyle, rng: &mut R) -> Option<Self> {
        match style {
            HudStyle::Barebones => Some(Self::barebones()),
            HudStyle::Random => Some(Self::random(rng)),
            HudStyle::None => None,
        }
    }
}

/// Draw the HUD at GUI scale `scale`.
pub fn draw_hud<S: DrawSurface>(surface: &mut S, sprites: &HudSprites, stats: &HudStats, scale: u32) {
    let s = scale.max(1) as f32;
    let (w, h) = (surface.width() as f32, surface.height() as f32);
    let hotbar_x = round_half_up(w / 2.0) - 91.0 * s - (0.5 * s).floor();

    let mut blit = |sprite: &Option<ImageBuffer>, x: f32, y: f32, width: f32, height: f32| {
        if let Some(image) = sprite {
            let crop = Rect::new(0.0, 0.0, image.width() as f32, image.height() as f32);
            surface.draw_image(image, crop, Rect::new(x, y, width * s, height * s));
        }
    };

    blit(&sprites.hotbar, hotbar_x, h - 22.0 * s, 182.0, 22.0);
    blit(
        &sprites.selection,
        hotbar_x - s + 20.0 * s * stats.selected_slot as f32,
        h - 23.0 * s,
        24.0,
        23.0,
    );
    blit(&sprites.xp_background, hotbar_x, h - 29.0 * s, 182.0, 5.0);
    icon_row(&mut blit, stats.hearts, |i| (hotbar_x + i * 8.0 * s, h - 39.0 * s), [
        &sprites.heart_container,
        &sprites.heart_full,
        &sprites.heart_half,
    ]);
    icon_row(
        &mut blit,
        stats.food,
        |i| (hotbar_x + 101.0 * s + (9.0 - i) * 8.0 * s, h - 39.0 * s),
        [&sprites.food_empty, &sprites.food_full, &sprites.food_half],
    );
    if let Some(armor) = stats.armor {
        icon_row(&mut blit, armor, |i| (hotbar_x + i * 8.0 * s, h - 49.0 * s), [
            &sprites.armor_empty,
            &sprites.armor_full,
            &sprites.armor_half,
        ]);
    }

    if let Some(progress) = &sprites.xp_progress {
        let filled = stats.xp_progress.min(progress.width()) as f32;
        surface.draw_image(
            progress,
            Rect::new(0.0, 0.0, filled, 5.0),
            Rect::new(hotbar_x, h - 29.0 * s, filled * s, 5.0 * s),
        );
    }

    if let Some(crosshair) = &sprites.crosshair {
        let crop = Rect::new(0.0, 0.0, crosshair.width() as f32, crosshair.height() as f32);
        surface.draw_image(
            crosshair,
            crop,
            Rect::new(
                round_half_up(w / 2.0) - round_half_up(7.5 * s),
                round_half_up(h / 2.0) - round_half_up(7.5 * s) - (0.5 * s).floor(),
                15.0 * s,
                15.0 * s,
            ),
        );
    }
}

/// Ten 9x9 icons: container, then full or half depending on `value`.
fn icon_row(
    blit: &mut impl FnMut(&Option<ImageBuffer>, f32, f32, f32, f32),
    value: f32,
    position: impl Fn(f32) -> (f32, f32),
    [empty, full, half]: [&Option<ImageBuffer>; 3],
) {
    for i in 0..10 {
        let i = i as f32;
        let (x, y) = position(i);
        blit(empty, x, y, 9.0, 9.0);
        let fill = (value - i).clamp(0.0, 1.0);
        if fill == 1.0 {
            blit(full, x, y, 9.0, 9.0);
        } else if fill == 0.5 {
            blit(half, x, y, 9.0, 9.0);
        }
    }
}

use serde::{Deserialize, Serialize};

/// A catalog entry as seeded into the store. Also the shape of `[[catalog]]`
/// entries in config.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSeed {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

/// Built-in catalog used when config.toml defines no `[[catalog]]` entries.
#[must_use]
pub fn default_products() -> Vec<ProductSeed> {
    [
        (
            "wh-100",
            "Wireless Headphones",
            "audio",
            79.99,
            "Over-ear Bluetooth headphones with 30h battery life.",
            "/images/wh-100.jpg",
        ),
        (
            "kb-200",
            "Mechanical Keyboard",
            "peripherals",
            129.0,
            "Tenkeyless board with hot-swappable switches.",
            "/images/kb-200.jpg",
        ),
        (
            "ms-150",
            "Ergonomic Mouse",
            "peripherals",
            49.5,
            "Vertical mouse with adjustable DPI.",
            "/images/ms-150.jpg",
        ),
        (
            "mn-270",
            "27\" Monitor",
            "displays",
            249.99,
            "1440p IPS panel, 144Hz.",
            "/images/mn-270.jpg",
        ),
        (
            "sp-050",
            "Desk Speakers",
            "audio",
            89.0,
            "Compact powered stereo speakers.",
            "/images/sp-050.jpg",
        ),
        (
            "hb-010",
            "USB-C Hub",
            "accessories",
            34.99,
            "7-in-1 hub with HDMI and card reader.",
            "/images/hb-010.jpg",
        ),
        (
            "lp-300",
            "Laptop Stand",
            "accessories",
            27.5,
            "Aluminium stand, six height settings.",
            "/images/lp-300.jpg",
        ),
        (
            "cm-400",
            "Webcam",
            "peripherals",
            59.99,
            "1080p webcam with privacy shutter.",
            "/images/cm-400.jpg",
        ),
    ]
    .into_iter()
    .map(
        |(id, name, category, price, description, image)| ProductSeed {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            price,
            description: description.to_string(),
            image: image.to_string(),
        },
    )
    .collect()
}

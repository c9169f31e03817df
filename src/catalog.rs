use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One product card. Field names serialize in camelCase so catalog files
/// match the JSON feed the storefront exports (`oldPrice`, `reviewCount`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<f64>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    /// Installment offer line. Empty means no badge.
    #[serde(default)]
    pub installment: String,
    #[serde(default)]
    pub promos: Vec<String>,
}

impl Product {
    /// Percent knocked off the old price, rounded to the nearest whole
    /// number. Zero when there is no old price or it is not above the
    /// current price.
    pub fn discount_percent(&self) -> u8 {
        match self.old_price {
            Some(old) if old > self.price => ((old - self.price) / old * 100.0).round() as u8,
            _ => 0,
        }
    }

    pub fn has_installment(&self) -> bool {
        !self.installment.is_empty()
    }
}

/// Star breakdown for a rating: full stars, an optional half star, then
/// empty stars padding the row to exactly five positions.
pub fn star_counts(rating: f64) -> (usize, bool, usize) {
    let rating = rating.clamp(0.0, 5.0);
    let full = rating.floor() as usize;
    let half = rating - rating.floor() >= 0.5;
    let empty = 5 - full - usize::from(half);
    (full, half, empty)
}

/// Read a catalog from a JSON file holding an array of products.
pub fn load_products(path: &Path) -> Result<Vec<Product>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read product file: {}", path.display()))?;
    let products: Vec<Product> = serde_json::from_str(&content)
        .with_context(|| format!("invalid product JSON in {}", path.display()))?;
    Ok(products)
}

/// Built-in demo catalog used when the caller supplies no items.
pub fn sample_products() -> Vec<Product> {
    fn product(
        id: &str,
        name: &str,
        seed: &str,
        price: f64,
        old_price: f64,
        rating: f64,
        review_count: u32,
        installment: &str,
        promos: &[&str],
    ) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            image: format!("https://picsum.photos/seed/{seed}/400/400"),
            price,
            old_price: Some(old_price),
            rating,
            review_count,
            installment: installment.to_string(),
            promos: promos.iter().map(|p| p.to_string()).collect(),
        }
    }

    vec![
        product(
            "p1",
            "iPhone 15 128GB | Hàng chính hãng VN/A",
            "iphone",
            18_990_000.0,
            21_990_000.0,
            4.7,
            1253,
            "Trả góp 0%",
            &["Tặng gói iCloud 50GB 3 tháng", "Giảm thêm 500k khi mở thẻ mới"],
        ),
        product(
            "p2",
            "Samsung Galaxy A55 5G 8GB/256GB",
            "a55",
            8_990_000.0,
            10_490_000.0,
            4.4,
            842,
            "Trả góp 0%",
            &["Ưu đãi Galaxy Gift", "Bảo hành 18 tháng"],
        ),
        product(
            "p3",
            "Xiaomi Redmi Note 13 Pro 5G 12GB/512GB",
            "redmi13",
            7_990_000.0,
            8_990_000.0,
            4.3,
            601,
            "Trả góp 0%",
            &["Tặng ốp lưng", "Giảm 10% phụ kiện kèm theo"],
        ),
        product(
            "p4",
            "OPPO Reno12 5G 12GB/256GB",
            "reno12",
            10_990_000.0,
            11_990_000.0,
            4.5,
            410,
            "Trả góp 0%",
            &["Tặng gói bảo hành rơi vỡ 6 tháng"],
        ),
        product(
            "p5",
            "Realme C67 8GB/256GB",
            "realmec67",
            5_290_000.0,
            5_990_000.0,
            4.1,
            219,
            "Trả góp 0%",
            &["Giảm 5% khi mua kèm sim"],
        ),
        product(
            "p6",
            "Apple Watch SE GPS 40mm (2023)",
            "watchse",
            5_790_000.0,
            6_590_000.0,
            4.6,
            330,
            "Trả góp 0%",
            &["Giảm 15% dây đeo"],
        ),
        product(
            "p7",
            "Tai nghe Bluetooth AirPods 3",
            "airpods3",
            4_190_000.0,
            4_990_000.0,
            4.2,
            980,
            "",
            &["Tặng hộp sạc nhanh"],
        ),
        product(
            "p8",
            "Laptop ASUS Vivobook 15 i5-12450H/16GB/512GB",
            "vivo15",
            14_990_000.0,
            16_990_000.0,
            4.3,
            188,
            "Trả góp 0%",
            &["Tặng balo thời trang", "Office H&S 1 năm"],
        ),
        product(
            "p9",
            "Máy lọc không khí Xiaomi 4",
            "airpurifier4",
            2_790_000.0,
            3_290_000.0,
            4.0,
            90,
            "",
            &["Freeship nội thành"],
        ),
        product(
            "p10",
            "TV Samsung 43\" 4K UHD 2024",
            "tv43",
            6_290_000.0,
            7_990_000.0,
            4.2,
            145,
            "Trả góp 0%",
            &["Tặng 12 tháng FPT Play"],
        ),
    ]
}

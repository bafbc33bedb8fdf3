//! Product identification from `StateVersion` replies.

/// Vendor id assigned to LIFX.
pub const VENDOR_LIFX: u32 = 1;

const PRODUCTS: &[(u32, &str)] = &[
    (1, "LIFX Original 1000"),
    (3, "LIFX Color 650"),
    (10, "LIFX White 800 (Low Voltage)"),
    (11, "LIFX White 800 (High Voltage)"),
    (15, "LIFX Color 1000"),
    (18, "LIFX White 900 BR30 (Low Voltage)"),
    (19, "LIFX White 900 BR30 (High Voltage)"),
    (20, "LIFX Color 1000 BR30"),
    (22, "LIFX Color 1000"),
    (27, "LIFX A19"),
    (28, "LIFX BR30"),
    (29, "LIFX A19 Night Vision"),
    (30, "LIFX BR30 Night Vision"),
    (31, "LIFX Z"),
    (32, "LIFX Z"),
    (36, "LIFX Downlight"),
    (37, "LIFX Downlight"),
    (38, "LIFX Beam"),
    (43, "LIFX A19"),
    (44, "LIFX BR30"),
    (45, "LIFX A19 Night Vision"),
    (46, "LIFX BR30 Night Vision"),
    (49, "LIFX Mini Color"),
    (50, "LIFX Mini White to Warm"),
    (51, "LIFX Mini White"),
    (52, "LIFX GU10"),
    (55, "LIFX Tile"),
    (57, "LIFX Candle"),
    (59, "LIFX Mini Color"),
    (60, "LIFX Mini White to Warm"),
    (61, "LIFX Mini White"),
    (62, "LIFX A19"),
    (63, "LIFX BR30"),
    (64, "LIFX A19 Night Vision"),
    (65, "LIFX BR30 Night Vision"),
    (66, "LIFX Mini White"),
    (68, "LIFX Candle"),
    (81, "LIFX Candle White to Warm"),
    (82, "LIFX Filament Clear"),
    (85, "LIFX Filament Amber"),
    (87, "LIFX Mini White"),
    (88, "LIFX Mini White"),
    (90, "LIFX Clean"),
    (91, "LIFX Color"),
    (92, "LIFX Color"),
    (93, "LIFX A19 US"),
    (94, "LIFX BR30"),
    (96, "LIFX Candle White to Warm"),
    (97, "LIFX A19"),
    (98, "LIFX BR30"),
    (99, "LIFX Clean"),
    (100, "LIFX Filament Clear"),
    (101, "LIFX Filament Amber"),
    (109, "LIFX A19 Night Vision"),
    (110, "LIFX BR30 Night Vision"),
    (111, "LIFX A19 Night Vision"),
    (112, "LIFX BR30 Night Vision Intl"),
    (113, "LIFX Mini WW US"),
    (114, "LIFX Mini WW Intl"),
    (117, "LIFX Z US"),
    (118, "LIFX Z Intl"),
    (119, "LIFX Beam US"),
    (120, "LIFX Beam Intl"),
];

/// Model name for a vendor/product pair, if known.
///
/// # Examples
///
/// ```
/// use lifx_lights_rs::product_name;
///
/// assert_eq!(product_name(1, 27), Some("LIFX A19"));
/// assert_eq!(product_name(1, 9999), None);
/// assert_eq!(product_name(2, 27), None);
/// ```
pub fn product_name(vendor: u32, product: u32) -> Option<&'static str> {
    if vendor != VENDOR_LIFX {
        return None;
    }
    PRODUCTS
        .binary_search_by_key(&product, |(id, _)| *id)
        .ok()
        .map(|idx| PRODUCTS[idx].1)
}

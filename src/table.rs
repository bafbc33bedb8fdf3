//! Plain-text table for `list`.

use crate::info::LightInfo;

/// Renders one header, a dashed rule and one row per light.
///
/// Columns are padded to their widest value and separated by two spaces.
/// The color column comes last and is left unpadded.
pub fn render(lights: &[LightInfo]) -> String {
    let power_names: Vec<String> = lights.iter().map(|l| l.power.to_string()).collect();
    let name_w = column_width("NAME", lights.iter().map(|l| l.label.as_str()));
    let ip_w = column_width("IP", lights.iter().map(|l| l.ip.as_str()));
    let mac_w = column_width("MAC", lights.iter().map(|l| l.mac.as_str()));
    let model_w = column_width("MODEL", lights.iter().map(|l| l.product.as_str()));
    let power_w = column_width("POWER", power_names.iter().map(String::as_str));

    let header = format!(
        "{:<name_w$}  {:<ip_w$}  {:<mac_w$}  {:<model_w$}  {:<power_w$}  COLOR",
        "NAME", "IP", "MAC", "MODEL", "POWER"
    );

    let mut out = String::new();
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"-".repeat(header.chars().count()));
    out.push('\n');

    for (light, power) in lights.iter().zip(&power_names) {
        let color = light.color.map(|c| c.to_string()).unwrap_or_default();
        out.push_str(&format!(
            "{:<name_w$}  {:<ip_w$}  {:<mac_w$}  {:<model_w$}  {:<power_w$}  {}\n",
            light.label, light.ip, light.mac, light.product, power, color
        ));
    }
    out
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

use gaugekit::{Color, Gauge, GaugeConfig};

fn main() {
    let config = GaugeConfig::builder()
        .value(72.0)
        .value_colors(vec![
            Color::new(0xd0, 0x02, 0x1b),
            Color::new(0xf5, 0xa6, 0x23),
            Color::new(0x7e, 0xd3, 0x21),
        ])
        .build();

    // One document per stock shape, separated by blank lines.
    for gauge in [
        Gauge::circle(config.clone()),
        Gauge::curve(config.clone()),
        Gauge::semicircle(config),
    ] {
        println!("{}", gauge.to_svg());
        println!();
    }
}

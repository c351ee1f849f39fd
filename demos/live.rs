use gaugekit::{Gauge, GaugeCommand, GaugeConfig};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = GaugeConfig::builder()
        .value(30.0)
        .value_colors(vec!["#ff0000".parse()?, "#ffa500".parse()?, "#008000".parse()?])
        .build();
    let gauge = Gauge::circle(config);

    // Feed the preview with a fresh random value every 800ms
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let value = rng.random_range(0.0..100.0);
            let label = if value > 95.0 {
                Some("MAX".to_string())
            } else {
                None
            };

            let commands = [GaugeCommand::SetValue(value), GaugeCommand::SetLabel(label)];
            if commands.iter().any(|cmd| sender.send(cmd.clone()).is_err()) {
                break;
            }

            thread::sleep(Duration::from_millis(800));
        }
    });

    println!("Displaying gauge fed by random values");
    println!("Press Ctrl+C to exit");

    gauge.show_with_commands(receiver)
}

use bubble_core::config::load_flows;
use bubble_core::Paths;

pub async fn run() -> anyhow::Result<()> {
    let paths = Paths::new();
    let flows = load_flows(&paths)?;

    println!("Saved flows ({}):", flows.len());
    for flow in &flows {
        println!("  {:<20} {} [{}]", flow.name, flow.description, flow.icon);
    }
    Ok(())
}

//! Print the layout of a NetCDF file and statistics of one field.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use charney::data_loader::load_field;

#[derive(Parser, Debug)]
#[command(name = "inspect_netcdf")]
#[command(about = "Inspect dimensions, variables and a field of a NetCDF file")]
struct Args {
    /// NetCDF file to inspect
    path: PathBuf,

    /// Variable to summarize
    #[arg(long, default_value = "difference_of_prec")]
    variable: String,

    #[arg(long, default_value = "lat")]
    lat: String,

    #[arg(long, default_value = "lon")]
    lon: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Inspecting NetCDF file: {}", args.path.display());

    let file = netcdf::open(&args.path)
        .with_context(|| format!("Failed to open {}", args.path.display()))?;

    println!("\nDimensions:");
    for dim in file.dimensions() {
        println!(
            "  {} = {}{}",
            dim.name(),
            dim.len(),
            if dim.is_unlimited() { " (unlimited)" } else { "" }
        );
    }

    println!("\nVariables:");
    for var in file.variables() {
        let dims: Vec<String> = var
            .dimensions()
            .iter()
            .map(|dim| format!("{} = {}", dim.name(), dim.len()))
            .collect();
        println!("  {} [{}]", var.name(), dims.join(", "));

        for attr in var.attributes() {
            match attr.value() {
                Ok(val) => println!("    {}: {:?}", attr.name(), val),
                Err(e) => println!("    {}: error reading value: {}", attr.name(), e),
            }
        }
    }

    println!("\nGlobal Attributes:");
    for attr in file.attributes() {
        match attr.value() {
            Ok(val) => println!("  {}: {:?}", attr.name(), val),
            Err(e) => println!("  {}: error reading value: {}", attr.name(), e),
        }
    }
    drop(file);

    if args.variable.is_empty() {
        return Ok(());
    }

    let field = load_field(&args.path, &args.variable, &args.lat, &args.lon)
        .with_context(|| format!("Failed to load {}", args.variable))?;
    let stats = field.stats();

    println!("\nField {}:", args.variable);
    println!("  shape = {:?}", field.shape());
    if let (Some(first), Some(last)) = (field.lat().first(), field.lat().last()) {
        println!("  lat = {} .. {}", first, last);
    }
    if let (Some(first), Some(last)) = (field.lon().first(), field.lon().last()) {
        println!("  lon = {} .. {}", first, last);
    }
    match (stats.min, stats.max, stats.mean) {
        (Some(min), Some(max), Some(mean)) => {
            println!("  min = {min}, max = {max}, mean = {mean}")
        }
        _ => println!("  no present values"),
    }
    println!("  missing = {} of {}", stats.missing, stats.total);

    Ok(())
}

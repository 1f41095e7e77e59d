use std::error::Error;
use std::io;
use std::path::PathBuf;
use structopt::StructOpt;
use zoning_resolver::classify_all;
use zoning_resolver::geo::Location;
use zoning_resolver::loader::DataSources;
use zoning_resolver::output::Output;

fn parse_neighbor(s: &str) -> Result<(String, PathBuf), String> {
    let mut parts = s.splitn(2, '=');
    match (parts.next(), parts.next()) {
        (Some(name), Some(path)) if !name.trim().is_empty() && !path.is_empty() => {
            Ok((name.trim().into(), PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=PATH, got {:?}", s)),
    }
}

#[derive(StructOpt, Debug)]
#[structopt(
    name = "zoning_resolver",
    about = "Classify coordinates against land-use zoning layers"
)]
struct Opt {
    /// City boundary (GeoJSON FeatureCollection)
    #[structopt(long, parse(from_os_str))]
    city: Option<PathBuf>,

    /// Borough polygons
    #[structopt(long, parse(from_os_str))]
    boroughs: Option<PathBuf>,

    /// Conservation soil mask
    #[structopt(long, parse(from_os_str))]
    conservation: Option<PathBuf>,

    /// Ecological zoning polygons
    #[structopt(long, parse(from_os_str))]
    zoning: Option<PathBuf>,

    /// Natural protected areas
    #[structopt(long, parse(from_os_str))]
    protected_areas: Option<PathBuf>,

    /// Internal zoning of protected areas, may be repeated
    #[structopt(long, parse(from_os_str))]
    protected_area_zoning: Vec<PathBuf>,

    /// Neighboring jurisdiction as NAME=PATH, checked in the given order
    #[structopt(long, parse(try_from_str = parse_neighbor))]
    neighbor: Vec<(String, PathBuf)>,

    /// Activity rule table (CSV with a header row)
    #[structopt(long, parse(from_os_str))]
    rules: Option<PathBuf>,

    /// Write a GeoJSON FeatureCollection instead of JSON lines
    #[structopt(long)]
    geojson: bool,

    /// Coordinates to classify, as LAT,LNG
    #[structopt(required = true)]
    coordinates: Vec<Location>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let opt = Opt::from_args();

    let sources = DataSources {
        city: opt.city,
        boroughs: opt.boroughs,
        conservation: opt.conservation,
        zoning: opt.zoning,
        protected_areas: opt.protected_areas,
        protected_area_zoning: opt.protected_area_zoning,
        neighbors: opt.neighbor,
        rules: opt.rules,
    };
    let snapshot = sources.load();
    let results = classify_all(&snapshot, &opt.coordinates);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if opt.geojson {
        results.write_geojson(&mut handle)?;
    } else {
        results.write_json_lines(&mut handle)?;
    }
    Ok(())
}

//! Lacework CLI - shoelace curve generation over eyelet meshes.
//!
//! Usage: lacework <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `lacework --help` for available commands.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use lacework::io;
use lacework::lace::{
    create_lace, find_corner_vertices, IndexGrid, KnotSettings, LaceSettings, LacingMethod,
};
use lacework::mesh::HalfEdgeMesh;

#[derive(Parser)]
#[command(name = "lacework")]
#[command(author, version, about = "Shoelace curve generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh and lattice information
    Info {
        /// Input mesh file (.obj or .ply)
        input: PathBuf,
    },

    /// Generate a lace over a four-cornered patch
    Lace {
        /// Input mesh file (.obj or .ply)
        input: PathBuf,

        /// Output curve file (.json)
        output: PathBuf,

        /// Lacing method
        #[arg(short, long, value_enum, default_value = "display")]
        method: Method,

        /// Side of the patch the lace starts from (0-3)
        #[arg(short, long, default_value = "0")]
        offset: usize,

        /// Bevel depth of the lace
        #[arg(short, long, default_value = "0.01")]
        bevel_depth: f64,

        /// Handle length at the eyelets
        #[arg(long, default_value = "0.1")]
        side_handle_length: f64,

        /// Ratio of centre handle length to neighbour distance
        #[arg(long, default_value = "0.5")]
        center_handle_ratio: f64,

        /// Emit a control point at every edge crossing
        #[arg(long)]
        detailed: bool,

        /// Keep the top and bottom centre points on the surface
        #[arg(long)]
        no_center_offset: bool,

        /// Skip the hole-cutting curve
        #[arg(long)]
        no_hole_curve: bool,

        /// Knot fragment to splice into the top row (.json)
        #[arg(long)]
        knot: Option<PathBuf>,

        /// Knot spline joined to the left strand
        #[arg(long, default_value = "0", requires = "knot")]
        knot_left: usize,

        /// Knot spline joined to the right strand
        #[arg(long, default_value = "1", requires = "knot")]
        knot_right: usize,

        /// Reverse the left knot spline
        #[arg(long, requires = "knot")]
        reverse_left: bool,

        /// Reverse the right knot spline
        #[arg(long, requires = "knot")]
        reverse_right: bool,

        /// Mirror the knot front to back
        #[arg(long, requires = "knot")]
        invert_knot: bool,

        /// Also write the cut working mesh here (.obj or .ply)
        #[arg(long)]
        debug_mesh: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Criss-cross between every pair of rows
    Display,
    /// Straight bars alternating with crossed pairs
    BowTie,
}

impl From<Method> for LacingMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Display => LacingMethod::Display,
            Method::BowTie => LacingMethod::BowTie,
        }
    }
}

/// Knot flags gathered from the command line.
struct KnotArgs {
    path: PathBuf,
    left: usize,
    right: usize,
    reverse_left: bool,
    reverse_right: bool,
    invert: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Lace {
            input,
            output,
            method,
            offset,
            bevel_depth,
            side_handle_length,
            center_handle_ratio,
            detailed,
            no_center_offset,
            no_hole_curve,
            knot,
            knot_left,
            knot_right,
            reverse_left,
            reverse_right,
            invert_knot,
            debug_mesh,
        } => {
            let settings = LaceSettings::default()
                .with_method(method.into())
                .with_offset(offset)
                .with_bevel_depth(bevel_depth)
                .with_side_handle_length(side_handle_length)
                .with_center_handle_length_ratio(center_handle_ratio)
                .with_simple_curve(!detailed)
                .with_center_offset(!no_center_offset)
                .with_hole_curve(!no_hole_curve);

            let knot = knot.map(|path| KnotArgs {
                path,
                left: knot_left,
                right: knot_right,
                reverse_left,
                reverse_right,
                invert: invert_knot,
            });

            cmd_lace(&input, &output, settings, knot, debug_mesh.as_ref())?;
        }
    }

    Ok(())
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Half-edges: {}", mesh.num_halfedges());

    if mesh.is_quad_mesh() {
        println!("Mesh type: Quad mesh");
    } else {
        println!("Mesh type: Mixed polygon mesh");
    }

    let area: f64 = mesh.face_ids().map(|f| mesh.face_area(f)).sum();
    println!("Surface area: {:.6}", area);

    if let Some((min, max)) = mesh.bounding_box() {
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    let boundary = mesh.vertex_ids().filter(|&v| mesh.is_boundary_vertex(v)).count();
    println!("Boundary vertices: {}", boundary);

    let corners = match find_corner_vertices(&mesh) {
        Ok(corners) => corners,
        Err(e) => {
            println!("Lace patch: no ({})", e);
            return Ok(());
        }
    };
    let ids: Vec<usize> = corners.iter().map(|c| c.index()).collect();
    println!("Corners: {:?}", ids);

    for offset in 0..4 {
        match IndexGrid::build(&mesh, &corners, offset) {
            Ok(grid) => println!("  offset {}: {} x {} lattice", offset, grid.width(), grid.height()),
            Err(e) => println!("  offset {}: {}", offset, e),
        }
    }

    Ok(())
}

fn cmd_lace(
    input: &PathBuf,
    output: &PathBuf,
    mut settings: LaceSettings,
    knot: Option<KnotArgs>,
    debug_mesh: Option<&PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;
    log::info!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    if let Some(knot) = knot {
        let fragment = io::curve::load_knot(&knot.path)?;
        log::info!("Knot: {} ({} splines)", knot.path.display(), fragment.splines.len());
        settings = settings.with_knot(
            KnotSettings::new(fragment)
                .with_splines(knot.left, knot.right)
                .with_reversed(knot.reverse_left, knot.reverse_right)
                .with_invert(knot.invert),
        );
    }

    log::info!("Lacing with {} method (offset {})...", settings.method, settings.offset % 4);

    let start = Instant::now();
    let curves = create_lace(&mesh, &settings)?;
    let elapsed = start.elapsed();

    println!(
        "Result: {} points ({} side), {}",
        curves.lace.points.len(),
        curves.lace.side_count(),
        if curves.lace.cyclic { "closed" } else { "open" }
    );
    if let Some(hole) = &curves.hole {
        println!("Hole curve: {} segments", hole.len());
    }

    io::curve::save_curves(&curves, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    if let Some(path) = debug_mesh {
        save_cut_mesh(&mesh, &settings, path)?;
    }

    Ok(())
}

/// Replay the diagonal cuts on a copy of the mesh and write it out.
fn save_cut_mesh(
    mesh: &HalfEdgeMesh,
    settings: &LaceSettings,
    path: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    use lacework::lace::{LaceContext, LacingStrategy};

    let corners = find_corner_vertices(mesh)?;
    let grid = IndexGrid::build(mesh, &corners, settings.offset)?;
    let mut work = mesh.clone();
    {
        let mut ctx = LaceContext::new(&mut work, &grid, settings);
        settings.method.create_curve_points(&mut ctx)?;
    }

    io::save(&work, path)?;
    log::info!(
        "Cut mesh: {} vertices, {} faces -> {}",
        work.num_vertices(),
        work.num_faces(),
        path.display()
    );
    Ok(())
}

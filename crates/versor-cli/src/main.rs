use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use versor_clifford::{
    algebra::MultiplicationTableBuilder, build_layout, conformalize, Layout, LayoutConfig,
    MetricSignature, MultiVector, Product, VersorError,
};

const BANNER: &str = r#"
__   _____ _ __ ___  ___  _ __
\ \ / / _ \ '__/ __|/ _ \| '__|
 \ V /  __/ |  \__ \ (_) | |
  \_/ \___|_|  |___/\___/|_|"#;

#[derive(Parser)]
#[command(
    name = "versor",
    about = "Geometric algebra engine CLI",
    long_about = "Build Clifford algebras Cl(p,q,r) and evaluate multivector operations.\n\nMultivectors are written as comma-separated terms: a bare number is the\nscalar part and `name=coeff` sets a blade, e.g. \"1, e12=0.5, e3=-2\".",
    version,
)]
struct Cli {
    #[command(flatten)]
    algebra: AlgebraArgs,
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct AlgebraArgs {
    /// Generators squaring to +1
    #[arg(short, long, default_value = "3", global = true)]
    p: usize,
    /// Generators squaring to -1
    #[arg(short, long, default_value = "0", global = true)]
    q: usize,
    /// Null generators
    #[arg(short, long, default_value = "0", global = true)]
    r: usize,
    /// Blade name prefix
    #[arg(long, default_value = "e", global = true)]
    prefix: String,
    /// Index of the first generator in blade names
    #[arg(long, default_value = "1", global = true)]
    first_index: usize,
    /// JSON layout config; replaces the flags above
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Describe the algebra: signature, blades and table sizes
    Info,
    /// Print a multiplication table
    Table {
        /// geometric, outer or inner
        #[arg(long, default_value = "geometric")]
        product: String,
    },
    /// Multiplicative inverse of a multivector
    Inv { mv: String },
    /// Exponential of a multivector
    Exp { mv: String },
    /// Dual of a multivector
    Dual { mv: String },
    /// Factorise a blade into vectors
    Factorise { mv: String },
    /// Map a vector to a conformal point
    Up { mv: String },
    /// Time table construction and products
    Bench {
        /// Numbers of generators to benchmark (comma-separated)
        #[arg(long, default_value = "3,4,5,6,8")]
        dims: String,
    },
}

#[derive(Serialize)]
struct Report {
    algebra: String,
    display: String,
    value: Vec<f64>,
}

impl From<&MultiVector> for Report {
    fn from(mv: &MultiVector) -> Self {
        Report {
            algebra: mv.layout().signature().to_string(),
            display: mv.to_string(),
            value: mv.value().to_vec(),
        }
    }
}

#[derive(Serialize)]
struct FactorReport {
    algebra: String,
    scale: f64,
    factors: Vec<Report>,
}

impl FactorReport {
    fn new(blade: &MultiVector) -> Result<Self, VersorError> {
        let (factors, scale) = blade.factorise()?;
        Ok(FactorReport {
            algebra: blade.layout().signature().to_string(),
            scale,
            factors: factors.iter().map(Report::from).collect(),
        })
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Commands::Bench { dims } = &cli.command {
        cmd_bench(dims);
        return Ok(());
    }

    let config = load_config(&cli.algebra)?;
    let (layout, _) = build_layout(&config)?;

    match &cli.command {
        Commands::Info => cmd_info(&layout),
        Commands::Table { product } => cmd_table(&layout, product)?,
        Commands::Inv { mv } => emit(cli.json, &parse_mv(&layout, mv)?.inv()?)?,
        Commands::Exp { mv } => emit(cli.json, &parse_mv(&layout, mv)?.exp())?,
        Commands::Dual { mv } => emit(cli.json, &parse_mv(&layout, mv)?.dual()?)?,
        Commands::Factorise { mv } => cmd_factorise(cli.json, &parse_mv(&layout, mv)?)?,
        Commands::Up { mv } => {
            let conformal = conformalize(&layout)?;
            emit(cli.json, &conformal.up(&parse_mv(&layout, mv)?)?)?
        }
        Commands::Bench { .. } => unreachable!("handled above"),
    }
    Ok(())
}

fn load_config(args: &AlgebraArgs) -> Result<LayoutConfig, Box<dyn std::error::Error>> {
    if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path)?;
        let config: LayoutConfig = serde_json::from_str(&text)?;
        tracing::debug!("loaded layout config from {}", path.display());
        return Ok(config);
    }
    Ok(LayoutConfig::new(args.p, args.q, args.r)
        .with_prefix(&args.prefix)
        .with_first_index(args.first_index))
}

/// Parse "1, e12=0.5, e3=-2" into a multivector.
fn parse_mv(layout: &Layout, text: &str) -> versor_core::Result<MultiVector> {
    let mut value = vec![0.0; layout.ga_dims()];
    for term in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (mask, coeff) = match term.split_once('=') {
            Some((name, c)) => {
                let mask = layout
                    .basis()
                    .index_of(name.trim())
                    .ok_or_else(|| VersorError::UnknownBlade(name.trim().to_string()))?;
                (mask, parse_coeff(c)?)
            }
            None => (0, parse_coeff(term)?),
        };
        value[mask] += coeff;
    }
    layout.multivector(value)
}

fn parse_coeff(text: &str) -> versor_core::Result<f64> {
    text.trim()
        .parse()
        .map_err(|_| VersorError::TypeMismatch(format!("not a number: {}", text.trim())))
}

fn emit(json: bool, mv: &MultiVector) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&Report::from(mv))?);
    } else {
        println!("{}", mv);
    }
    Ok(())
}

fn cmd_info(layout: &Layout) {
    println!("{}", BANNER);
    println!("  v{}  -  Geometric algebra engine\n", env!("CARGO_PKG_VERSION"));

    let sig = layout.signature();
    println!("Algebra {}", sig);
    println!("  generators: {} (p={}, q={}, r={})", sig.dims(), sig.p(), sig.q(), sig.r());
    println!("  squares:    {:?}", sig.squares());
    println!("  blades:     {}", layout.ga_dims());

    println!("\nBlades by grade");
    for g in 0..=layout.dims() {
        let names: Vec<&str> = layout
            .basis()
            .blades_of_grade(g)
            .into_iter()
            .map(|m| if m == 0 { "1" } else { layout.basis().label(m) })
            .collect();
        println!("  {:>2}: {}", g, names.join(" "));
    }

    println!("\nTable entries (nonzero)");
    let tables = layout.tables();
    for product in [Product::Geometric, Product::Outer, Product::Inner] {
        println!("  {:<10} {}", format!("{:?}", product).to_lowercase(), tables.nnz(product));
    }
}

fn cmd_table(layout: &Layout, product: &str) -> Result<(), Box<dyn std::error::Error>> {
    let product = match product {
        "geometric" => Product::Geometric,
        "outer" => Product::Outer,
        "inner" => Product::Inner,
        other => {
            return Err(Box::new(VersorError::TypeMismatch(format!("unknown product: {}", other))))
        }
    };
    let basis = layout.basis();
    let name = |m: usize| if m == 0 { "1".to_string() } else { basis.label(m).to_string() };
    let width = (0..layout.ga_dims()).map(|m| name(m).len()).max().unwrap_or(1) + 2;

    print!("{:>w$}", "", w = width);
    for b in 0..layout.ga_dims() {
        print!("{:>w$}", name(b), w = width);
    }
    println!();
    for a in 0..layout.ga_dims() {
        print!("{:>w$}", name(a), w = width);
        for b in 0..layout.ga_dims() {
            let entry = layout.tables().entry(product, a, b);
            let cell = match entry.sign {
                versor_clifford::Sign::Zero => "0".to_string(),
                versor_clifford::Sign::Pos => name(entry.blade),
                versor_clifford::Sign::Neg => format!("-{}", name(entry.blade)),
            };
            print!("{:>w$}", cell, w = width);
        }
        println!();
    }
    Ok(())
}

fn cmd_factorise(json: bool, blade: &MultiVector) -> Result<(), Box<dyn std::error::Error>> {
    let report = FactorReport::new(blade)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("scale: {}", report.scale);
        for (i, f) in report.factors.iter().enumerate() {
            println!("f{}: {}", i + 1, f.display);
        }
    }
    Ok(())
}

fn cmd_bench(dims_str: &str) {
    let dims: Vec<usize> = dims_str
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    println!("=== versor Table Benchmark ===\n");
    println!("{:<12} {:>8} {:>12} {:>12} {:>12}",
        "Algebra", "Blades", "Build (ms)", "Geo (us)", "Inv (us)");
    println!("{}", "-".repeat(60));

    for &n in &dims {
        let signature = match MetricSignature::from_pqr(n, 0, 0) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("skipping n={}: {}", n, e);
                continue;
            }
        };
        let build_iters = if n <= 6 { 50 } else { 3 };
        let build_s = time_it(build_iters, || {
            let _ = MultiplicationTableBuilder::new(&signature).build();
        });

        let layout = match Layout::from_signature(&signature) {
            Ok(l) => l,
            Err(e) => {
                eprintln!("skipping n={}: {}", n, e);
                continue;
            }
        };
        let a = layout.random_mv(None);
        let b = layout.random_mv(None);
        let iters = if n <= 5 { 5000 } else if n <= 8 { 100 } else { 5 };

        let geo_s = time_it(iters, || {
            let _ = &a * &b;
        });
        let inv_s = time_it((iters / 10).max(1), || {
            let _ = a.inv();
        });

        println!("{:<12} {:>8} {:>10.3}ms {:>10.2}us {:>10.2}us",
            signature.to_string(),
            layout.ga_dims(),
            build_s * 1000.0,
            geo_s * 1e6,
            inv_s * 1e6,
        );
    }
}

fn time_it(iters: usize, mut f: impl FnMut()) -> f64 {
    let start = Instant::now();
    for _ in 0..iters {
        f();
    }
    start.elapsed().as_secs_f64() / iters as f64
}

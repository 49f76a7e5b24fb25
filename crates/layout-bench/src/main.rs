use std::hint::black_box;
use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use dnd_layout::geometry::{Point, Rect};
use dnd_layout::layout::flex::{
    FlexDirection, FlexLayoutItem, FlowMeasure, ItemBoundsSnapshot, calculate_new_order,
    calculate_transforms,
};
use dnd_layout::layout::grid::{CompactMode, GridLayoutItem, MoveOptions, compact, move_element};

#[derive(Parser, Debug)]
#[command(
    name = "layout-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Headless benchmark for the grid and flex layout engines"
)]
struct BenchCli {
    /// Iterations per phase.
    #[arg(short = 'n', long = "iterations", default_value_t = 2_000)]
    iterations: u32,

    /// Items per generated layout.
    #[arg(short = 'i', long = "items", default_value_t = 60)]
    items: usize,

    /// Grid columns.
    #[arg(short = 'c', long = "columns", default_value_t = 12)]
    columns: i32,

    /// Seed for the layout generator. Defaults to the clock.
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,
}

struct BenchConfig {
    iterations: u32,
    items: usize,
    columns: i32,
    seed: u64,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(1..=1_000_000).contains(&cli.iterations) {
            return Err("iterations must be between 1 and 1000000".to_string());
        }
        if !(2..=5_000).contains(&cli.items) {
            return Err("items must be between 2 and 5000".to_string());
        }
        if !(1..=256).contains(&cli.columns) {
            return Err("columns must be between 1 and 256".to_string());
        }
        Ok(Self {
            iterations: cli.iterations,
            items: cli.items,
            columns: cli.columns,
            seed: cli.seed.unwrap_or_else(seed_from_clock),
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let mut rng = Lcg::new(config.seed);
    let phases = vec![
        bench_compact(&config, &mut rng),
        bench_moves(&config, &mut rng),
        bench_flex_reorder(&config, &mut rng),
    ];
    println!("{}", final_report(&config, &phases));
    Ok(())
}

struct PhaseStats {
    name: &'static str,
    runs: u32,
    total: Duration,
    fastest: Duration,
    slowest: Duration,
}

impl PhaseStats {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            runs: 0,
            total: Duration::ZERO,
            fastest: Duration::MAX,
            slowest: Duration::ZERO,
        }
    }

    fn record(&mut self, elapsed: Duration) {
        self.runs = self.runs.saturating_add(1);
        self.total += elapsed;
        self.fastest = self.fastest.min(elapsed);
        self.slowest = self.slowest.max(elapsed);
    }

    fn average_us(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.total.as_secs_f64() / self.runs as f64 * 1_000_000.0
    }

    fn ops_per_second(&self) -> f64 {
        let secs = self.total.as_secs_f64();
        if secs > 0.0 {
            self.runs as f64 / secs
        } else {
            0.0
        }
    }

    fn line(&self) -> String {
        let fastest = if self.runs == 0 {
            0.0
        } else {
            self.fastest.as_secs_f64() * 1_000_000.0
        };
        format!(
            "{:<14} runs {:>8} | avg {:>9.2} us | best {:>9.2} us | worst {:>9.2} us | {:>10.0} ops/s",
            self.name,
            self.runs,
            self.average_us(),
            fastest,
            self.slowest.as_secs_f64() * 1_000_000.0,
            self.ops_per_second(),
        )
    }
}

fn bench_compact(config: &BenchConfig, rng: &mut Lcg) -> PhaseStats {
    let mut stats = PhaseStats::new("compact");
    for _ in 0..config.iterations {
        let layout = random_grid(config, rng);
        let start = Instant::now();
        black_box(compact(
            &layout,
            CompactMode::Vertical,
            config.columns,
            false,
        ));
        stats.record(start.elapsed());
    }
    stats
}

fn bench_moves(config: &BenchConfig, rng: &mut Lcg) -> PhaseStats {
    let mut stats = PhaseStats::new("move_element");
    let options = MoveOptions {
        compaction: CompactMode::Vertical,
        columns: config.columns,
        prevent_collision: false,
        allow_overlap: false,
    };
    let mut layout = compact(
        &random_grid(config, rng),
        CompactMode::Vertical,
        config.columns,
        false,
    );
    for _ in 0..config.iterations {
        let index = rng.below(layout.len() as u32) as usize;
        let id = layout[index].id.clone();
        let x = rng.below(config.columns as u32) as i32;
        let y = rng.below(config.items as u32) as i32;
        let start = Instant::now();
        layout = move_element(&layout, &id, x, y, true, &options);
        stats.record(start.elapsed());
    }
    black_box(&layout);
    stats
}

fn bench_flex_reorder(config: &BenchConfig, rng: &mut Lcg) -> PhaseStats {
    let mut stats = PhaseStats::new("flex reorder");
    let gap = 4.0;
    let layout: Vec<FlexLayoutItem> = (0..config.items)
        .map(|i| FlexLayoutItem::new(format!("f{i}"), i as i32).with_basis(20.0 + rng.below(60) as f64))
        .collect();
    let extent: f64 = layout
        .iter()
        .filter_map(|item| item.basis)
        .map(|basis| basis + gap)
        .sum();
    let measure = FlowMeasure::new(Rect::new(0.0, 0.0, extent, 20.0), FlexDirection::Row, gap)
        .layout(&layout);
    let bounds = ItemBoundsSnapshot::collect(&measure, &layout);

    for _ in 0..config.iterations {
        let dragged = format!("f{}", rng.below(config.items as u32));
        let Some(rect) = bounds.get(&dragged) else {
            continue;
        };
        let pointer = Point::new(rng.below(extent as u32) as f64, 10.0);
        let start = Instant::now();
        let order = calculate_new_order(&dragged, pointer, &bounds, FlexDirection::Row, gap)
            .unwrap_or_else(|| bounds.order().to_vec());
        black_box(calculate_transforms(
            &dragged,
            &order,
            rect,
            &bounds,
            FlexDirection::Row,
            gap,
        ));
        stats.record(start.elapsed());
    }
    stats
}

fn random_grid(config: &BenchConfig, rng: &mut Lcg) -> Vec<GridLayoutItem> {
    (0..config.items)
        .map(|i| {
            let w = 1 + rng.below(config.columns.clamp(1, 4) as u32) as i32;
            let h = 1 + rng.below(3) as i32;
            let x = rng.below((config.columns - w + 1).max(1) as u32) as i32;
            let y = rng.below(config.items as u32) as i32;
            GridLayoutItem::new(format!("g{i}"), x, y, w, h)
        })
        .collect()
}

fn final_report(config: &BenchConfig, phases: &[PhaseStats]) -> String {
    let lines: Vec<String> = phases.iter().map(PhaseStats::line).collect();
    indoc::formatdoc!(
        r#"
        Layout bench (seed {seed}).
        Items: {items} | Columns: {columns} | Iterations: {iterations}
        {lines}
        "#,
        seed = config.seed,
        items = config.items,
        columns = config.columns,
        iterations = config.iterations,
        lines = lines.join("\n"),
    )
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
        ^ 0xA5A5_A5A5_1234_5678
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn below(&mut self, bound: u32) -> u32 {
        self.next() % bound.max(1)
    }
}

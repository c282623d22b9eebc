use clap::{Args, Parser, Subcommand};
use inkmath::{
  Answer, ParsedInput, TriangleMeasurement, Vertex, answer, answer_system,
  answer_triangle, clean_ocr_text, normalize,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Print results as JSON
  #[arg(long, global = true)]
  json: bool,

  /// Log every derivation step to stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Solve an equation, integrate an integral or evaluate an expression
  Solve {
    /// LaTeX input, e.g. "x^2 - 5 x + 6 = 0"
    latex: String,
    /// Clean up raw OCR output before parsing
    #[arg(long)]
    raw_ocr: bool,
  },
  /// Solve a system of equations, one LaTeX equation per argument
  System {
    #[arg(required = true)]
    equations: Vec<String>,
  },
  /// Solve a triangle from partial measurements (angles in degrees)
  Triangle(TriangleArgs),
  /// Show how a LaTeX string is classified and canonicalized
  Normalize {
    latex: String,
    #[arg(long)]
    raw_ocr: bool,
  },
}

#[derive(Args)]
struct TriangleArgs {
  #[arg(long)]
  a: Option<f64>,
  #[arg(long)]
  b: Option<f64>,
  #[arg(long)]
  c: Option<f64>,
  #[arg(long)]
  angle_a: Option<f64>,
  #[arg(long)]
  angle_b: Option<f64>,
  #[arg(long)]
  angle_c: Option<f64>,
  /// Vertex carrying a right angle (A, B or C)
  #[arg(long)]
  right_at: Option<Vertex>,
}

impl From<TriangleArgs> for TriangleMeasurement {
  fn from(args: TriangleArgs) -> Self {
    TriangleMeasurement {
      a: args.a,
      b: args.b,
      c: args.c,
      angle_a: args.angle_a,
      angle_b: args.angle_b,
      angle_c: args.angle_c,
      right_at: args.right_at,
    }
  }
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

fn prepare(latex: String, raw_ocr: bool) -> String {
  if raw_ocr { clean_ocr_text(&latex) } else { latex }
}

fn print_answer(answer: &Answer, as_json: bool) -> anyhow::Result<()> {
  if as_json {
    let value = json!({
      "prompt": answer.prompt,
      "kind": answer.kind.as_str(),
      "latex": answer.latex,
      "steps": answer.steps.as_slice(),
      "numeric": answer.numeric,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
  } else {
    println!("{}", answer.latex);
    println!("{}", answer.steps);
  }
  Ok(())
}

fn print_normalized(parsed: &ParsedInput, as_json: bool) -> anyhow::Result<()> {
  let value = match parsed {
    ParsedInput::Expression(expr) => json!({
      "kind": parsed.kind().as_str(),
      "text": expr.text(),
    }),
    ParsedInput::Equation(equation) => json!({
      "kind": parsed.kind().as_str(),
      "left": equation.left.text(),
      "right": equation.right.text(),
    }),
    ParsedInput::Integral(integral) => json!({
      "kind": parsed.kind().as_str(),
      "integrand": integral.integrand.text(),
      "variable": integral.variable,
      "lower": integral.lower.as_ref().map(|e| e.text()),
      "upper": integral.upper.as_ref().map(|e| e.text()),
    }),
  };
  if as_json {
    println!("{}", serde_json::to_string_pretty(&value)?);
  } else {
    match parsed {
      ParsedInput::Expression(expr) => println!("expr: {}", expr),
      ParsedInput::Equation(equation) => println!("equation: {}", equation),
      ParsedInput::Integral(integral) => println!("integral: {}", integral),
    }
  }
  Ok(())
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match cli.command {
    Commands::Solve { latex, raw_ocr } => {
      let result = answer(&prepare(latex, raw_ocr))?;
      print_answer(&result, cli.json)
    }
    Commands::System { equations } => {
      let result = answer_system(&equations)?;
      print_answer(&result, cli.json)
    }
    Commands::Triangle(args) => {
      let result = answer_triangle(args.into())?;
      print_answer(&result, cli.json)
    }
    Commands::Normalize { latex, raw_ocr } => {
      let parsed = normalize(&prepare(latex, raw_ocr))?;
      print_normalized(&parsed, cli.json)
    }
  }
}

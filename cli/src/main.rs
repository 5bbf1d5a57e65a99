use std::env;
use std::fs;
use std::io;
use std::io::Write;
use std::process;

use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use npchunk::{noun_phrase_chunks, preprocess, Err, Grammar};

fn usage(prog_name: &str) -> String {
  format!(
    r"Usage: {} [FILE] [options]

Parses the sentence in FILE, or prompts for sentences until end of input.

Options:
  -h, --help             Print this message
  -g, --grammar GRAMMAR  Parse with the grammar in GRAMMAR (defaults to the built-in grammar)
  -c, --chart            Print the parse chart (defaults to not printing)",
    prog_name
  )
}

fn parse(g: &Grammar, sentence: &str, print_chart: bool) -> Result<(), Err> {
  let words = preprocess(sentence);
  debug!(?words, "preprocessed");

  let forest = match g.parse_forest(&words) {
    Ok(forest) => forest,
    Err(err) => {
      // a bad sentence isn't fatal, the next one might be fine
      warn!(%err, "rejected input");
      println!("{}", err);
      return Ok(());
    }
  };

  if print_chart {
    println!("chart:\n{}", forest.chart());
  }

  if forest.is_empty() {
    println!("Could not parse sentence.");
    return Ok(());
  }

  let count = forest.tree_count();
  println!("Parsed {} tree{}", count, if count == 1 { "" } else { "s" });

  for tree in forest.trees() {
    println!("{}", tree);
    println!();
    println!("Noun Phrase Chunks");
    for chunk in noun_phrase_chunks(&tree) {
      println!("{}", chunk);
    }
    println!();
  }

  Ok(())
}

struct Args {
  filename: Option<String>,
  grammar: Option<String>,
  print_chart: bool,
}

impl Args {
  fn make_error_message(msg: &str, prog_name: impl AsRef<str>) -> String {
    format!("argument error: {}.\n\n{}", msg, usage(prog_name.as_ref()))
  }

  fn parse(v: Vec<String>) -> Result<Self, String> {
    let mut iter = v.into_iter();
    let Some(prog_name) = iter.next() else {
      return Err(Self::make_error_message("bad argument vector", "npchunk"));
    };

    let mut filename: Option<String> = None;
    let mut grammar: Option<String> = None;
    let mut print_chart = false; // default to *not* printing the chart

    while let Some(o) = iter.next() {
      if o == "-h" || o == "--help" {
        println!("{}", usage(&prog_name));
        process::exit(0);
      } else if o == "-c" || o == "--chart" {
        print_chart = true;
      } else if o == "-g" || o == "--grammar" {
        match iter.next() {
          Some(path) if grammar.is_none() => grammar = Some(path),
          Some(_) => return Err(Self::make_error_message("grammar given twice", prog_name)),
          None => return Err(Self::make_error_message("missing grammar file", prog_name)),
        }
      } else if filename.is_none() && !o.starts_with('-') {
        filename = Some(o);
      } else {
        return Err(Self::make_error_message("invalid arguments", prog_name));
      }
    }

    Ok(Self {
      filename,
      grammar,
      print_chart,
    })
  }
}

fn main() -> Result<(), Err> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  let opts = match Args::parse(env::args().collect()) {
    Ok(opts) => opts,
    Err(msg) => {
      eprintln!("{}", msg);
      process::exit(255);
    }
  };

  let g = match &opts.grammar {
    Some(path) => Grammar::read_from_file(path)?,
    None => Grammar::sentences(),
  };

  if let Some(filename) = &opts.filename {
    let sentence = fs::read_to_string(filename)?;
    return parse(&g, &sentence, opts.print_chart);
  }

  let mut input = String::new();
  loop {
    print!("Sentence: ");
    io::stdout().flush()?;

    match io::stdin().read_line(&mut input) {
      Ok(_) => {
        if input.is_empty() {
          // ctrl+d
          return Ok(());
        }
        parse(&g, input.trim(), opts.print_chart)?;
        input.clear();
      }
      Err(error) => return Err(error.into()),
    }
  }
}

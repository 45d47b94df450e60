use anyhow::Context;
use clap::Parser;

use suffix_tree::SuffixTree;

/// Build a suffix tree over TEXT and print it in GraphViz dot format,
/// or report where a pattern occurs in it.
#[derive(Parser)]
#[command(name = "stree")]
struct Args {
    /// Text to index (multiple words are joined with spaces).
    #[arg(required = true)]
    text: Vec<String>,

    /// Print the occurrence positions of this pattern instead of the tree.
    #[arg(short, long)]
    pattern: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let text = args.text.join(" ");
    let tree = SuffixTree::new(text).context("cannot index text")?;
    match args.pattern {
        Some(pattern) => {
            let mut positions: Vec<usize> = tree.matches(&pattern).collect();
            positions.sort_unstable();
            println!("{} occurrence(s) of {:?}", positions.len(), pattern);
            for pos in positions {
                println!("{pos}");
            }
        }
        None => print!("{}", tree.to_dot()),
    }
    Ok(())
}

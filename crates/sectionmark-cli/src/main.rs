use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use sectionmark_config::Config;
use sectionmark_nlp::{
    Lexicon, NoteCharProvider, Tokenizer, TokenizerOptions, WordFrequencyList,
};
use sectionmark_syntax::{OutlineTree, SectionDocument, SectionLexer, serialize, serializer};
use std::path::{Path, PathBuf};
use std::{fs, process};

#[derive(Parser)]
#[command(name = "sectionmark")]
#[command(about = "Section-level markdown outlines: lex, parse, round-trip and word statistics")]
struct Args {
    /// Config file to use instead of ~/.config/sectionmark/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the lexeme stream of a file
    Lex { file: PathBuf },
    /// Print the section outline of a file with its metadata
    Parse { file: PathBuf },
    /// Parse and serialize a file again
    Roundtrip {
        file: PathBuf,
        /// Print nothing; exit with status 1 when the output differs from the input
        #[arg(long)]
        check: bool,
    },
    /// Word statistics over notes; defaults to the configured notes directory
    Words {
        files: Vec<PathBuf>,
        /// Number of words (and similar note pairs) to list
        #[arg(long, default_value_t = 20)]
        top: usize,
        /// Also list the most similar pairs of notes
        #[arg(long)]
        similar: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("No config file at {}", path.display()))
            .map(Some)?,
        None => Config::load()?,
    };

    match args.command {
        Command::Lex { file } => lex(&file),
        Command::Parse { file } => print_outline(&file),
        Command::Roundtrip { file, check } => {
            if !roundtrip(&file, check)? {
                process::exit(1);
            }
            Ok(())
        }
        Command::Words {
            files,
            top,
            similar,
        } => words(config.as_ref(), files, top, similar),
    }
}

fn lex(file: &Path) -> Result<()> {
    let mut lexer = SectionLexer::from_path(file);
    lexer.tokenize()?;
    print!("{}", lexer.dump());
    Ok(())
}

fn print_outline(file: &Path) -> Result<()> {
    let document = sectionmark_syntax::parse_file(file)?;
    let tree = OutlineTree::build(&document.sections);

    tree.walk(|index, level| {
        let section = &document.sections[index];
        let name = if section.is_preamble() {
            "(preamble)"
        } else {
            section.name()
        };
        let comment = serializer::metadata_comment(&section.metadata)
            .map(|comment| format!(" {comment}"))
            .unwrap_or_default();
        println!(
            "{}{}{} [{} lines]",
            "  ".repeat(level),
            name,
            comment,
            section.body.len()
        );
    });
    Ok(())
}

/// `true` when the serialized document equals the file contents.
fn roundtrip(file: &Path, check: bool) -> Result<bool> {
    let original =
        fs::read_to_string(file).with_context(|| format!("Reading {}", file.display()))?;
    let output = serialize(&sectionmark_syntax::parse(&original)?);

    if !check {
        print!("{output}");
    }
    Ok(output == original)
}

struct Note {
    label: String,
    words: WordFrequencyList,
}

fn words(config: Option<&Config>, files: Vec<PathBuf>, top: usize, similar: bool) -> Result<()> {
    let files = if files.is_empty() {
        let Some(config) = config else {
            bail!(
                "No files given and no config at {}",
                Config::config_path().display()
            );
        };
        config
            .note_files()
            .with_context(|| format!("Listing notes in {}", config.notes_path.display()))?
    } else {
        files
    };

    let options = config.map_or_else(TokenizerOptions::default, |c| TokenizerOptions {
        lowercase: c.tokenizer.lowercase,
        use_blacklist: c.tokenizer.use_blacklist,
    });
    let delimiter = config.map_or("\n", |c| c.note_delimiter.as_str());
    let tokenizer = Tokenizer::new(options);

    let mut lexicon = Lexicon::new();
    let mut notes = Vec::new();
    let mut link_count = 0;
    for file in &files {
        let document = sectionmark_syntax::parse_file(file)?;
        for (label, words, links) in tokenize_document(&document, &tokenizer, delimiter, &mut lexicon) {
            link_count += links;
            notes.push(Note {
                label: format!("{}: {label}", file.display()),
                words,
            });
        }
    }
    log::info!(
        "Tokenized {} notes from {} files, {} links",
        notes.len(),
        files.len(),
        link_count
    );

    for entry in lexicon.leaderboard(top) {
        println!("{:>6}  {:.2}  {}", entry.frequency, entry.weight, entry.word);
    }

    if similar {
        println!();
        for (score, a, b) in most_similar(&notes, &lexicon, top) {
            println!("{score:.3}  {a}  <->  {b}");
        }
    }
    Ok(())
}

fn tokenize_document(
    document: &SectionDocument,
    tokenizer: &Tokenizer,
    delimiter: &str,
    lexicon: &mut Lexicon,
) -> Vec<(String, WordFrequencyList, usize)> {
    document
        .iter()
        .filter(|section| !section.is_preamble())
        .map(|section| {
            let mut words = WordFrequencyList::new();
            let links = tokenizer.tokenize(
                &mut NoteCharProvider::new(section, delimiter),
                lexicon,
                &mut words,
            );
            (section.name().to_string(), words, links.len())
        })
        .collect()
}

fn most_similar<'a>(notes: &'a [Note], lexicon: &Lexicon, top: usize) -> Vec<(f64, &'a str, &'a str)> {
    let mut pairs = Vec::new();
    for (i, a) in notes.iter().enumerate() {
        for b in &notes[i + 1..] {
            let score = a.words.similarity(&b.words, lexicon);
            if score > 0.0 {
                pairs.push((score, a.label.as_str(), b.label.as_str()));
            }
        }
    }
    pairs.sort_by(|x, y| y.0.total_cmp(&x.0));
    pairs.truncate(top);
    pairs
}

// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_notebook(notes: usize, body_lines: usize) -> String {
    let mut content = String::from(
        "# Notebook <!-- Metadata: type: Outline; created: 2017-01-01 10:00:00; reads: 1; -->\nIntro.\n\n",
    );
    for note in 0..notes {
        let hashes = "#".repeat(2 + note % 3);
        content.push_str(&format!(
            "{hashes} Note {note} <!-- Metadata: tags: bench, note{}; progress: {}%; -->\n",
            note % 10,
            note % 100
        ));
        for line in 0..body_lines {
            content.push_str(&format!("Body line {line} of note {note}, with some words.\n"));
        }
        content.push('\n');
    }
    content
}

#[allow(dead_code)]
pub fn generate_post_declared(notes: usize) -> String {
    let mut content = String::from("Outline\n=======\n\n");
    for note in 0..notes {
        content.push_str(&format!("Note {note}\n---------\nText.\n\n"));
    }
    content
}

#[allow(dead_code)]
pub fn line_count(content: &str) -> usize {
    content.lines().count()
}

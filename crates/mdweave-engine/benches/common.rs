// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with *some* content and a [link](/url).\n\n- Bullet point\n  - Nested item\n- Another item\n\n> Quoted `code` and\nlazy continuation.\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_nested_lists(items: usize, depth: usize) -> String {
    let mut content = String::new();
    for i in 0..items {
        for level in 0..depth {
            let indent = "  ".repeat(level);
            content.push_str(&format!("{indent}- item {i} at level {level}\n"));
        }
    }
    content
}

#[allow(dead_code)]
pub fn generate_inline_heavy(paragraphs: usize) -> String {
    let line = "Some **strong** and *emph* text with `code`, ~~struck~~ words, [[wiki|links]] and a [ref] to follow.\n";
    let mut content = String::from("[ref]: /target \"Title\"\n\n");
    for _ in 0..paragraphs {
        content.push_str(&line.repeat(4));
        content.push('\n');
    }
    content
}

//! The `mdquiz init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("mdquiz.toml").exists() {
        println!("mdquiz.toml already exists, skipping.");
    } else {
        std::fs::write("mdquiz.toml", SAMPLE_CONFIG)?;
        println!("Created mdquiz.toml");
    }

    std::fs::create_dir_all("question-banks")?;
    let example_path = std::path::Path::new("question-banks/example.md");
    if example_path.exists() {
        println!("question-banks/example.md already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created question-banks/example.md");
    }

    println!("\nNext steps:");
    println!("  1. Add your own questions to question-banks/example.md");
    println!("  2. Run: mdquiz validate --file question-banks/example.md");
    println!("  3. Run: mdquiz take --file question-banks/example.md");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# mdquiz configuration

# Where attempt history is kept. ${VAR} references are expanded.
data_dir = "${HOME}/.local/share/mdquiz"

[quiz]
duration_secs = 3600
sample_size = 40
pass_threshold = 80
history_cap = 50
"#;

const EXAMPLE_BANK: &str = r#"# Example question bank

Mark correct options by wrapping the letter or the whole option in **.
Questions with more than one correct option are multiple-select.

### **Question 1:** Which keyword declares an immutable binding in Rust?
a. var
b. **let**
c. mut
d. const fn

### **Question 2:** Which of these types implement `Copy`?
**a.** i32
b. String
**c.** bool
d. Vec<u8>

### **Question 3:** What does `Option::None` represent?
a. A null pointer
b. **The absence of a value**
c. An error
"#;

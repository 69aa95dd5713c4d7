//! The `answerkey init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create answerkey.toml
    if Path::new("answerkey.toml").exists() {
        println!("answerkey.toml already exists, skipping.");
    } else {
        std::fs::write("answerkey.toml", SAMPLE_CONFIG)?;
        println!("Created answerkey.toml");
    }

    // Create sample homework
    std::fs::create_dir_all("homework")?;
    for (name, content) in [
        ("homework/Solutions_HW1.txt", SAMPLE_SOLUTIONS),
        ("homework/alice_HW1.txt", SAMPLE_RESPONSES),
    ] {
        if Path::new(name).exists() {
            println!("{name} already exists, skipping.");
        } else {
            std::fs::write(name, content)?;
            println!("Created {name}");
        }
    }

    println!("\nNext steps:");
    println!("  1. Edit answerkey.toml to adjust grading options");
    println!("  2. Run: answerkey compile --solution homework/Solutions_HW1.txt");
    println!("  3. Run: answerkey grade --solution homework/Solutions_HW1.txt homework/alice_HW1.txt");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# answerkey configuration

create_results_file = true
expand_equivalents = false
parallelism = 4
output_dir = "./answerkey-results"

[grading]
preserve_spacing = false
list_order_matters = true
convert_fractions_to_decimals = true
default_point_value = 1.0
list_match = "exact"
"#;

const SAMPLE_SOLUTIONS: &str = "\
1. 23 & 92;Multiplied by 2 instead of dividing;0.0 & 17;Subtracted instead of added;0.5
2. Rectangle & Parallelogram ; A rectangle is a special parallelogram ; 0.5
3. 4/5 & 0.8
4. (4,5) & 5,4|(5,4) ; Values are switched! ; 0.5
5. 342.57 ; range 1.0 & 342.57 ; range 1.0 to 5.0 ; 0.5 ; Didn't multiply by acceleration?
";

const SAMPLE_RESPONSES: &str = "\
1. 23
2. parallelogram
3. 0.8
4. (5, 4)
5. 345
";

#[cfg(test)]
mod tests {
    use super::*;
    use answerkey_core::config::{parse_config, AnswerkeyConfig, GradingConfig};

    #[test]
    fn sample_config_matches_defaults() {
        let config = parse_config(SAMPLE_CONFIG).unwrap();
        let defaults = AnswerkeyConfig::default();
        assert_eq!(config.grading, GradingConfig::default());
        assert_eq!(config.create_results_file, defaults.create_results_file);
        assert_eq!(config.parallelism, defaults.parallelism);
        assert_eq!(config.output_dir, defaults.output_dir);
    }

    #[test]
    fn edited_sample_config_takes_effect() {
        let edited = SAMPLE_CONFIG
            .replace("create_results_file = true", "create_results_file = false")
            .replace("expand_equivalents = false", "expand_equivalents = true")
            .replace("parallelism = 4", "parallelism = 2")
            .replace("./answerkey-results", "./elsewhere");
        let config = parse_config(&edited).unwrap();
        assert!(!config.create_results_file);
        assert!(config.expand_equivalents);
        assert_eq!(config.parallelism, 2);
        assert_eq!(config.output_dir, std::path::PathBuf::from("./elsewhere"));
    }
}

//! `upskill check`: load-time validation of a taxonomy file.

use std::path::Path;

use anyhow::Result;

use super::load_taxonomy;

/// Validate a taxonomy and print its size; any load error propagates and
/// exits non-zero.
pub fn handle_check_command(taxonomy: &Path) -> Result<()> {
    let ontology = load_taxonomy(taxonomy)?;
    println!(
        "OK: {} skills, {} edges ({})",
        ontology.len(),
        ontology.edge_count(),
        taxonomy.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use upskill_test_utils::TestFixture;

    #[test]
    fn test_check_accepts_valid_taxonomy() {
        let fixture = TestFixture::new().unwrap();
        let path = fixture.write_sample_taxonomy().unwrap();
        assert!(handle_check_command(&path).is_ok());
    }

    #[test]
    fn test_check_rejects_dangling_edge() {
        let fixture = TestFixture::new().unwrap();
        let path = fixture
            .write(
                "broken.json",
                r#"{
                    "skills": [{"id": "a", "display_name": "A"}],
                    "edges": [{"kind": "is-related-to", "from_id": "a", "to_id": "ghost"}]
                }"#,
            )
            .unwrap();
        let err = handle_check_command(&path).unwrap_err();
        assert!(format!("{err:#}").contains("unknown skill 'ghost'"));
    }
}

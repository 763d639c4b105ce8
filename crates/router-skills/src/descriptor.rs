use std::path::{Path, PathBuf};

use crate::locator::SKILL_MARKER;

/// Summary of a skill read from its `SKILL.md` frontmatter.
///
/// Parsing is lenient: a missing or malformed frontmatter block leaves the
/// description empty and the name falls back to the directory name. The
/// directory name is what gets installed, so it stays the source of truth
/// for [`SkillDescriptor::dir_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDescriptor {
    /// Name declared in frontmatter, or the directory name.
    pub name: String,
    /// One-line description, possibly empty.
    pub description: String,
    /// The skill directory (parent of SKILL.md).
    pub dir: PathBuf,
}

impl SkillDescriptor {
    /// Read `<dir>/SKILL.md`. An unreadable file yields a bare descriptor.
    pub fn load(dir: &Path) -> Self {
        let content = std::fs::read_to_string(dir.join(SKILL_MARKER)).unwrap_or_default();
        Self::parse(&content, dir)
    }

    pub fn parse(content: &str, dir: &Path) -> Self {
        let (name, description) = frontmatter(content)
            .map(parse_fields)
            .unwrap_or_default();

        Self {
            name: name.unwrap_or_else(|| dir_name(dir)),
            description: description.unwrap_or_default(),
            dir: dir.to_path_buf(),
        }
    }

    /// Directory name used as the install name.
    pub fn dir_name(&self) -> String {
        dir_name(&self.dir)
    }
}

/// Last path component, or the empty string for `/`.
pub fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// The text between the leading `---` and the closing `---`, if any.
fn frontmatter(content: &str) -> Option<&str> {
    let trimmed = content.trim_start();
    let after_first = trimmed.strip_prefix("---")?;
    let end_pos = after_first.find("\n---")?;
    Some(after_first[..end_pos].trim())
}

fn parse_fields(yaml: &str) -> (Option<String>, Option<String>) {
    let mut name = None;
    let mut description = None;

    for line in yaml.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let value = unquote(value.trim());
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                "name" => name = Some(value),
                "description" => description = Some(value),
                _ => {}
            }
        }
    }

    (name, description)
}

/// Remove surrounding quotes from a YAML value.
fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_frontmatter_fields() {
        let content = "---\nname: pdf-tools\ndescription: \"Fill and merge PDFs\"\nversion: 1.0.0\n---\n\n# PDF";
        let d = SkillDescriptor::parse(content, Path::new("/repo/skills/pdf"));
        assert_eq!(d.name, "pdf-tools");
        assert_eq!(d.description, "Fill and merge PDFs");
        assert_eq!(d.dir_name(), "pdf");
    }

    #[test]
    fn missing_frontmatter_falls_back_to_dir_name() {
        let d = SkillDescriptor::parse("# Just markdown", Path::new("/repo/formatter"));
        assert_eq!(d.name, "formatter");
        assert!(d.description.is_empty());
    }

    #[test]
    fn unclosed_frontmatter_is_ignored() {
        let d = SkillDescriptor::parse("---\nname: broken\n", Path::new("/r/s"));
        assert_eq!(d.name, "s");
    }

    #[test]
    fn load_reads_marker_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("lint");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(SKILL_MARKER), "---\ndescription: Lint things\n---\n").unwrap();

        let d = SkillDescriptor::load(&dir);
        assert_eq!(d.name, "lint");
        assert_eq!(d.description, "Lint things");
    }

    #[test]
    fn load_without_file_is_bare() {
        let d = SkillDescriptor::load(Path::new("/definitely/not/here"));
        assert_eq!(d.name, "here");
    }
}

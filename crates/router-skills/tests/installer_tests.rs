#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use router_core::{CliTarget, InstalledSkill, RouterError, TargetDirs};
    use router_skills::batch::{FailurePolicy, InstallObserver, InstallOutcome, Silent};
    use router_skills::{FsInstaller, SkillInstaller, find_all, install_all};
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    fn make_skill(root: &Path, rel: &str) -> PathBuf {
        let dir = root.join(rel);
        std::fs::create_dir_all(dir.join("scripts")).unwrap();
        std::fs::write(dir.join("SKILL.md"), "---\nname: x\ndescription: y\n---\n").unwrap();
        std::fs::write(dir.join("scripts/run.sh"), "echo hi\n").unwrap();
        dir
    }

    fn fs_installer(home: &Path) -> FsInstaller {
        FsInstaller::new(TargetDirs::from_home(home))
    }

    // ── FsInstaller tests ──────────────────────────────────────

    #[tokio::test]
    async fn test_install_copies_tree_into_target_dir() {
        let src = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let skill = make_skill(src.path(), "skills/formatter");

        let installer = fs_installer(home.path());
        let msg = installer.install(&skill, CliTarget::Claude).await.unwrap();
        assert!(msg.contains("formatter"));

        let dest = home.path().join(".claude/skills/formatter");
        assert!(dest.join("SKILL.md").is_file());
        assert_eq!(
            std::fs::read_to_string(dest.join("scripts/run.sh")).unwrap(),
            "echo hi\n"
        );
    }

    #[tokio::test]
    async fn test_install_refuses_existing_skill() {
        let src = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let skill = make_skill(src.path(), "fmt");
        let installer = fs_installer(home.path());

        installer.install(&skill, CliTarget::Codex).await.unwrap();
        let err = installer.install(&skill, CliTarget::Codex).await.unwrap_err();
        assert!(matches!(err, RouterError::DispatchFailure(ref m) if m == "Skill already exists: fmt"));
    }

    #[tokio::test]
    async fn test_install_requires_marker() {
        let src = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let plain = src.path().join("not-a-skill");
        std::fs::create_dir_all(&plain).unwrap();

        let err = fs_installer(home.path())
            .install(&plain, CliTarget::Gemini)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing SKILL.md"));
        assert!(!home.path().join(".gemini/skills/not-a-skill").exists());
    }

    #[tokio::test]
    async fn test_install_skips_git_metadata() {
        let src = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let skill = make_skill(src.path(), "tools");
        std::fs::create_dir_all(skill.join(".git/objects")).unwrap();
        std::fs::write(skill.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();

        fs_installer(home.path())
            .install(&skill, CliTarget::Claude)
            .await
            .unwrap();
        let dest = home.path().join(".claude/skills/tools");
        assert!(dest.join("SKILL.md").is_file());
        assert!(!dest.join(".git").exists());
    }

    #[tokio::test]
    async fn test_list_returns_only_skills_sorted() {
        let src = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let installer = fs_installer(home.path());
        for name in ["zeta", "alpha"] {
            let skill = make_skill(src.path(), name);
            installer.install(&skill, CliTarget::Claude).await.unwrap();
        }
        std::fs::create_dir_all(home.path().join(".claude/skills/notes")).unwrap();

        let skills = installer.list(CliTarget::Claude).await.unwrap();
        let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(skills[0].path, home.path().join(".claude/skills/alpha"));
    }

    #[tokio::test]
    async fn test_list_missing_dir_is_empty() {
        let home = tempfile::tempdir().unwrap();
        let skills = fs_installer(home.path()).list(CliTarget::Codex).await.unwrap();
        assert!(skills.is_empty());
    }

    #[tokio::test]
    async fn test_remove_deletes_skill() {
        let src = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let installer = fs_installer(home.path());
        let skill = make_skill(src.path(), "fmt");
        installer.install(&skill, CliTarget::Claude).await.unwrap();

        let msg = installer.remove(CliTarget::Claude, "fmt").await.unwrap();
        assert!(msg.contains("removed"));
        assert!(!home.path().join(".claude/skills/fmt").exists());

        let err = installer.remove(CliTarget::Claude, "fmt").await.unwrap_err();
        assert_eq!(err.to_string(), "Skill not found: fmt");
    }

    #[tokio::test]
    async fn test_remove_rejects_traversal() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(home.path().join(".claude")).unwrap();
        let err = fs_installer(home.path())
            .remove(CliTarget::Claude, "..")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid skill name"));
        assert!(home.path().join(".claude").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_install_copies_symlink_targets() {
        let src = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let skill = make_skill(src.path(), "fmt");
        std::fs::write(src.path().join("shared.sh"), "echo shared\n").unwrap();
        std::fs::create_dir_all(src.path().join("assets")).unwrap();
        std::fs::write(src.path().join("assets/logo.txt"), "logo").unwrap();
        std::os::unix::fs::symlink("../shared.sh", skill.join("run.sh")).unwrap();
        std::os::unix::fs::symlink(src.path().join("assets"), skill.join("assets")).unwrap();

        fs_installer(home.path())
            .install(&skill, CliTarget::Claude)
            .await
            .unwrap();

        let dest = home.path().join(".claude/skills/fmt");
        assert_eq!(
            std::fs::read_to_string(dest.join("run.sh")).unwrap(),
            "echo shared\n"
        );
        assert!(!dest.join("run.sh").is_symlink());
        assert_eq!(
            std::fs::read_to_string(dest.join("assets/logo.txt")).unwrap(),
            "logo"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_copy_leaves_nothing_behind() {
        let src = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let skill = make_skill(src.path(), "fmt");
        std::os::unix::fs::symlink("../missing.sh", skill.join("run.sh")).unwrap();
        let installer = fs_installer(home.path());

        let err = installer.install(&skill, CliTarget::Codex).await.unwrap_err();
        assert!(matches!(err, RouterError::Access { .. }), "unexpected error: {err}");
        assert!(!home.path().join(".codex/skills/fmt").exists());

        // Once the link resolves, a retry is not blocked by leftovers.
        std::fs::write(src.path().join("missing.sh"), "echo ok\n").unwrap();
        installer.install(&skill, CliTarget::Codex).await.unwrap();
        assert!(home.path().join(".codex/skills/fmt/run.sh").is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_loop_is_an_error() {
        let src = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let skill = make_skill(src.path(), "fmt");
        std::os::unix::fs::symlink(&skill, skill.join("scripts/again")).unwrap();

        let err = fs_installer(home.path())
            .install(&skill, CliTarget::Gemini)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Symlink loop"));
        assert!(!home.path().join(".gemini/skills/fmt").exists());
    }

    // ── Batch tests ────────────────────────────────────────────

    /// Installer whose responses are scripted per target.
    struct ScriptedInstaller {
        fail_on: Vec<(CliTarget, &'static str)>,
        calls: Mutex<Vec<(String, CliTarget)>>,
    }

    #[async_trait]
    impl SkillInstaller for ScriptedInstaller {
        async fn install(&self, source: &Path, target: CliTarget) -> router_core::Result<String> {
            let name = source.file_name().unwrap().to_string_lossy().to_string();
            self.calls.lock().unwrap().push((name, target));
            match self.fail_on.iter().find(|(t, _)| *t == target) {
                Some((_, msg)) => Err(RouterError::DispatchFailure(msg.to_string())),
                None => Ok(format!("Installed to {target}")),
            }
        }

        async fn list(&self, _target: CliTarget) -> router_core::Result<Vec<InstalledSkill>> {
            Ok(Vec::new())
        }

        async fn remove(&self, _target: CliTarget, _name: &str) -> router_core::Result<String> {
            Ok(String::new())
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl InstallObserver for Recorder {
        fn skill_started(&mut self, skill: &str) {
            self.events.push(format!("skill:{skill}"));
        }
        fn target_started(&mut self, _skill: &str, target: CliTarget) {
            self.events.push(format!("start:{target}"));
        }
        fn target_finished(&mut self, outcome: &InstallOutcome) {
            let status = if outcome.is_success() { "ok" } else { "fail" };
            self.events.push(format!("{status}:{}", outcome.target));
        }
    }

    #[tokio::test]
    async fn test_failed_target_does_not_stop_batch() {
        let installer = ScriptedInstaller {
            fail_on: vec![(CliTarget::Codex, "disk full")],
            calls: Mutex::new(Vec::new()),
        };
        let skills = vec![PathBuf::from("/co/a"), PathBuf::from("/co/b")];
        let targets = [CliTarget::Claude, CliTarget::Codex, CliTarget::Gemini];

        let mut recorder = Recorder::default();
        let summary = install_all(&installer, &skills, &targets, &mut recorder).await;

        assert_eq!(summary.outcomes.len(), 6);
        assert_eq!(summary.succeeded(), 4);
        assert_eq!(summary.failed(), 2);
        for failure in summary.failures() {
            assert_eq!(failure.target, CliTarget::Codex);
            let err = failure.result.as_ref().unwrap_err();
            assert!(matches!(err, RouterError::DispatchFailure(m) if m == "disk full"));
        }

        let calls = installer.calls.lock().unwrap().clone();
        assert_eq!(calls[0], ("a".to_string(), CliTarget::Claude));
        assert_eq!(calls[2], ("a".to_string(), CliTarget::Gemini));
        assert_eq!(calls[3], ("b".to_string(), CliTarget::Claude));

        assert_eq!(
            &recorder.events[..4],
            &["skill:a", "start:claude", "ok:claude", "start:codex"]
        );
        assert_eq!(recorder.events[4], "fail:codex");
    }

    #[tokio::test]
    async fn test_failure_policy() {
        let installer = ScriptedInstaller {
            fail_on: vec![(CliTarget::Gemini, "boom")],
            calls: Mutex::new(Vec::new()),
        };
        let skills = vec![PathBuf::from("/co/a")];
        let summary = install_all(
            &installer,
            &skills,
            &[CliTarget::Claude, CliTarget::Gemini],
            &mut Silent,
        )
        .await;

        assert!(summary.is_ok(FailurePolicy::ReportOnly));
        assert!(!summary.is_ok(FailurePolicy::FailOnAny));
        assert_eq!(FailurePolicy::default(), FailurePolicy::ReportOnly);
    }

    // ── End-to-end over a checkout-shaped tree ─────────────────

    #[tokio::test]
    async fn test_discovered_skills_install_into_all_targets() {
        let checkout = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        make_skill(checkout.path(), "a");
        make_skill(checkout.path(), "b/c");

        let skills = find_all(checkout.path()).unwrap();
        assert_eq!(skills, vec![checkout.path().join("a"), checkout.path().join("b/c")]);

        let installer = fs_installer(home.path());
        let summary = install_all(&installer, &skills, &CliTarget::ALL, &mut Silent).await;
        assert_eq!(summary.failed(), 0);
        for target in ["claude", "codex", "gemini"] {
            assert!(home.path().join(format!(".{target}/skills/a/SKILL.md")).is_file());
            assert!(home.path().join(format!(".{target}/skills/c/SKILL.md")).is_file());
        }
    }
}

// tests/teardown.rs

//! Work directory lifecycle across phase failures.

mod common;

use common::{acme_catalog, direct};
use curator::creator::{ClasspathManifest, ClasspathManifestPhase, ResolutionPhase};
use curator::{AppCreationContext, AppCreationPhase, AppCreator, Error, ResolutionSettings, Result};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tempfile::TempDir;

/// Records the work directory, then optionally fails
struct ScratchWriter {
    seen: Rc<RefCell<Option<PathBuf>>>,
    fail: bool,
}

impl ScratchWriter {
    fn new(seen: &Rc<RefCell<Option<PathBuf>>>, fail: bool) -> Self {
        Self {
            seen: Rc::clone(seen),
            fail,
        }
    }
}

impl AppCreationPhase for ScratchWriter {
    fn name(&self) -> &str {
        if self.fail {
            "failing-scratch"
        } else {
            "scratch"
        }
    }

    fn process(&mut self, ctx: &mut AppCreationContext<'_>) -> Result<()> {
        let path = ctx.create_work_dir("scratch")?;
        std::fs::write(path.join("marker"), "x")?;
        *self.seen.borrow_mut() = Some(path);
        if self.fail {
            return Err(Error::Config("scratch failure".to_string()));
        }
        Ok(())
    }
}

fn resolution() -> ResolutionPhase {
    ResolutionPhase::new(
        vec![direct("io.acme:acme-rest:1.0.0")],
        ResolutionSettings::default(),
    )
}

#[test]
fn test_owned_work_dir_removed_on_failure() {
    let catalog = acme_catalog();
    let seen = Rc::new(RefCell::new(None));

    let result = AppCreator::new(&catalog)
        .add_phase(resolution())
        .add_phase(ScratchWriter::new(&seen, true))
        .add_phase(ClasspathManifestPhase::new())
        .run();

    match result {
        Err(Error::Phase { phase, source }) => {
            assert_eq!(phase, "failing-scratch");
            assert!(matches!(*source, Error::Config(_)));
        }
        other => panic!("unexpected result: {:?}", other.map(|r| r.len())),
    }
    let scratch = seen.borrow().clone().unwrap();
    assert!(!scratch.exists());
    assert!(!scratch.parent().unwrap().exists());
}

#[test]
fn test_owned_work_dir_removed_on_success() {
    let catalog = acme_catalog();
    let seen = Rc::new(RefCell::new(None));

    let mut outcomes = AppCreator::new(&catalog)
        .add_phase(resolution())
        .add_phase(ScratchWriter::new(&seen, false))
        .add_phase(ClasspathManifestPhase::new())
        .run()
        .unwrap();

    let manifest = outcomes.take::<ClasspathManifest>().unwrap();
    assert!(!manifest.runtime_path.exists());
    assert!(!seen.borrow().clone().unwrap().exists());
    assert_eq!(manifest.runtime.len(), 2);
}

#[test]
fn test_provided_work_dir_survives_failure() {
    let catalog = acme_catalog();
    let provided = TempDir::new().unwrap();
    let seen = Rc::new(RefCell::new(None));

    let result = AppCreator::new(&catalog)
        .with_work_dir(provided.path())
        .add_phase(ScratchWriter::new(&seen, true))
        .run();

    assert!(result.is_err());
    let scratch = seen.borrow().clone().unwrap();
    assert!(scratch.starts_with(provided.path()));
    assert!(scratch.join("marker").exists());
}

#[test]
fn test_failure_in_resolution_phase_is_wrapped() {
    let catalog = acme_catalog();
    let result = AppCreator::new(&catalog)
        .add_phase(ResolutionPhase::new(
            vec![direct("io.acme:missing:1.0.0")],
            ResolutionSettings::default(),
        ))
        .run();

    match result {
        Err(Error::Phase { phase, source }) => {
            assert_eq!(phase, "resolution");
            assert!(matches!(*source, Error::UnknownArtifact(_)));
        }
        other => panic!("unexpected result: {:?}", other.map(|r| r.len())),
    }
}

use minijinja::context;

use e2egen_core::artifact::{Artifact, ArtifactKind};
use e2egen_core::error::GeneratorError;
use e2egen_core::synth::OutputTree;

use crate::emitters::EmitContext;
use crate::layout::Layout;

/// Create `conftest.py` at the root of the tests tree. It discovers fixture
/// modules at import time, so it never needs to change once written.
pub fn emit(cx: &EmitContext<'_>, tree: &mut OutputTree) -> Result<(), GeneratorError> {
    let artifact = Artifact::new(ArtifactKind::Conftest, cx.layout.conftest_path())
        .in_package(Layout::package_root(&cx.layout.paths().tests));
    tree.emit(&artifact, || {
        cx.templates.render(
            "conftest.py.j2",
            context! {
                header => cx.templates.header(None, true)?,
                fixtures_package => cx.layout.fixtures_package(),
            },
        )
    })?;
    Ok(())
}

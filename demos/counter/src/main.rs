use std::time::Duration;

use anyhow::Context;
use fibril_core::prelude::*;
use fibril_devtools::Inspector;
use fibril_dom::{Document, NodeId};

const FRAME_BUDGET: Duration = Duration::from_millis(4);

fn counter(hooks: &mut Hooks<'_>, _props: &Props) -> Element {
    let (toggle, set_toggle) = hooks.use_state(false);
    let (count, set_count) = hooks.use_state(1i32);

    let heading = toggle.then(|| {
        element!(
            "h1",
            Some(Props::new().handler("onClick", move || {
                log::info!("h1 clicked");
                set_count.update(|c| c + 1);
            })),
            "Count: ",
            count,
        )
    });

    element!(
        "div",
        None,
        element!(
            "button",
            Some(Props::new().handler("onClick", move || {
                log::info!("button clicked");
                set_toggle.update(|t| !t);
            })),
            "Toggle Count",
        ),
        heading,
    )
}

fn run_until_idle(
    renderer: &mut Renderer<Document>,
    inspector: &mut Inspector,
    root: NodeId,
) -> anyhow::Result<()> {
    loop {
        let outcome = renderer.step(&TimeSlice::new(FRAME_BUDGET))?;
        inspector.observe(outcome, renderer);
        match outcome {
            StepOutcome::Committed => log::info!("{}", renderer.host().inner_html(root)),
            StepOutcome::Idle => return Ok(()),
            StepOutcome::Yielded => {}
        }
    }
}

fn click(renderer: &Renderer<Document>, root: NodeId, tag: &str) -> anyhow::Result<()> {
    let node = renderer
        .host()
        .find_by_tag(root, tag)
        .with_context(|| format!("no <{tag}> in the document"))?;
    renderer.host().dispatch(node, "click")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut doc = Document::new();
    let root = doc.create_element("body");
    let mut renderer = Renderer::new(doc);
    let mut inspector = Inspector::new();
    inspector.hud.enabled = std::env::var_os("FIBRIL_HUD").is_some();

    renderer.render(element!(Component::new("Counter", counter), None), root);
    run_until_idle(&mut renderer, &mut inspector, root)?;

    for tag in ["button", "h1", "h1", "button", "button"] {
        click(&renderer, root, tag)?;
        run_until_idle(&mut renderer, &mut inspector, root)?;
    }

    println!("{}", renderer.host().inner_html(root));
    println!("{} commits", inspector.hud.commit_count());
    Ok(())
}

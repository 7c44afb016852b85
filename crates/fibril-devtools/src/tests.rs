#[cfg(test)]
mod tests {
    use std::time::Duration;

    use fibril_core::*;
    use fibril_dom::{Document, NodeId};
    use web_time::Instant;

    use crate::*;

    fn sample() -> Element {
        element!(
            "div",
            Some(Props::new().set("id", "foo")),
            element!("a", None, "bar"),
            element!("b"),
        )
    }

    fn counter(hooks: &mut Hooks<'_>, _props: &Props) -> Element {
        let (count, set_count) = hooks.use_state(0);
        element!(
            "button",
            Some(Props::new().handler("onClick", move || set_count.update(|c| c + 1))),
            count
        )
    }

    fn renderer() -> (Renderer<Document>, NodeId) {
        let mut doc = Document::new();
        let root = doc.create_element("body");
        (Renderer::new(doc), root)
    }

    #[test]
    fn test_dump_before_first_commit() {
        let (r, _) = renderer();
        assert_eq!(dump_tree(&r), "<nothing committed>");
    }

    #[test]
    fn test_dump_tree_shows_effects() {
        let (mut r, root) = renderer();
        r.render(sample(), root);
        r.flush().unwrap();
        insta::assert_snapshot!(dump_tree(&r), @r#"
        #root
          <div id="foo"> [Placement]
            <a> [Placement]
              "bar" [Placement]
            <b> [Placement]
        "#);

        r.render(element!("div", None, element!("a", None, "baz")), root);
        r.flush().unwrap();
        insta::assert_snapshot!(dump_tree(&r), @r#"
        #root
          <div> [Update]
            <a> [Update]
              "baz" [Update]
        "#);
    }

    #[test]
    fn test_dump_tree_shows_components() {
        let (mut r, root) = renderer();
        r.render(element!(Component::new("Counter", counter), None), root);
        r.flush().unwrap();
        insta::assert_snapshot!(dump_tree(&r), @r#"
        #root
          Counter hooks=1 [Placement]
            <button onClick=<callback>> [Placement]
              "0" [Placement]
        "#);
    }

    #[test]
    fn test_snapshot_json() {
        let (mut r, root) = renderer();
        r.render(sample(), root);
        r.flush().unwrap();

        let json = snapshot(&r).to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["root"]["kind"], "root");
        assert!(v["root"].get("effect").is_none());

        let div = &v["root"]["children"][0];
        assert_eq!(div["kind"], "host");
        assert_eq!(div["name"], "div");
        assert_eq!(div["effect"], "Placement");
        assert_eq!(div["props"][0]["name"], "id");
        assert_eq!(div["props"][0]["value"], "foo");
        assert_eq!(div["children"][0]["children"][0]["kind"], "text");
        assert_eq!(div["children"][0]["children"][0]["name"], "bar");
        assert!(div["children"][1].get("children").is_none());

        assert_eq!(v["live_fibers"], 5);
        assert_eq!(v["pending_work"], false);
        assert_eq!(v["last_commit"]["units"], 5);
        assert_eq!(v["last_commit"]["placements"], 4);
    }

    #[test]
    fn test_snapshot_records_hooks_and_pending_work() {
        let (mut r, root) = renderer();
        r.render(element!(Component::new("Counter", counter), None), root);
        r.flush().unwrap();

        let button = r.host().find_by_tag(root, "button").unwrap();
        r.host().dispatch(button, "click").unwrap();

        let snap = snapshot(&r);
        assert!(snap.pending_work);
        let component = &snap.root.as_ref().unwrap().children[0];
        assert_eq!(component.kind, FiberKind::Component);
        assert_eq!(component.name, "Counter");
        assert_eq!(component.hooks, 1);
        // listeners are serialised by placeholder
        assert_eq!(component.children[0].props[0].value, "<callback>");
    }

    #[test]
    fn test_hud_smooths_rate() {
        let mut hud = Hud::new();
        let t0 = Instant::now();
        hud.record_at(CommitStats::default(), t0);
        assert_eq!(hud.commits_per_second(), 0.0);

        hud.record_at(CommitStats::default(), t0 + Duration::from_millis(100));
        assert!((hud.commits_per_second() - 10.0).abs() < 1e-3);

        hud.record_at(CommitStats::default(), t0 + Duration::from_millis(150));
        // 0.8 * 10 + 0.2 * 20
        assert!((hud.commits_per_second() - 12.0).abs() < 1e-3);
        assert_eq!(hud.commit_count(), 3);
    }

    #[test]
    fn test_hud_status_line() {
        let mut hud = Hud::new();
        assert_eq!(hud.status_line(), "commit: 0  |  rate: 0.0/s");
        hud.record(CommitStats {
            units: 5,
            placements: 4,
            updates: 1,
            deletions: 2,
            released: 0,
            live_fibers: 5,
        });
        assert_eq!(
            hud.status_line(),
            "commit: 1  |  rate: 0.0/s  |  units: 5  |  +4 ~1 -2  |  fibers: 5"
        );
    }

    #[test]
    fn test_inspector_counts_commits_only() {
        let (mut r, root) = renderer();
        let mut inspector = Inspector::new();
        inspector.hud.toggle();
        r.render(sample(), root);

        let zero = || Duration::ZERO;
        loop {
            let outcome = r.step(&zero).unwrap();
            inspector.observe(outcome, &r);
            if outcome == StepOutcome::Committed {
                break;
            }
        }
        inspector.observe(r.step(&Unbounded).unwrap(), &r);
        assert_eq!(inspector.hud.commit_count(), 1);
        assert_eq!(inspector.hud.stats.unwrap().units, 5);
    }
}

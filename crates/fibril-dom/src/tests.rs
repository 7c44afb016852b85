#[cfg(test)]
mod tests {
    use std::time::Duration;

    use fibril_core::*;

    use crate::*;

    fn zero() -> Duration {
        Duration::ZERO
    }

    fn mount(element: Element) -> (Renderer<Document>, NodeId) {
        let mut doc = Document::new();
        let root = doc.create_element("body");
        let mut r = Renderer::new(doc);
        r.render(element, root);
        r.flush().unwrap();
        (r, root)
    }

    fn visible(doc: &Document) -> Vec<Mutation> {
        doc.mutations()
            .iter()
            .filter(|m| MutationKinds::VISIBLE.contains(m.kind()))
            .cloned()
            .collect()
    }

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

    const COUNTER: Component = Component::new("Counter", counter);

    fn pair(_hooks: &mut Hooks<'_>, _props: &Props) -> Element {
        element!("main", None, element!(COUNTER, None), element!(COUNTER, None))
    }

    #[test]
    fn test_scenario_renders_expected_document() {
        let (r, root) = mount(sample());
        insta::assert_snapshot!(r.host().inner_html(root), @r#"<div id="foo"><a>bar</a><b></b></div>"#);
        // body, div, a, "bar", b
        assert_eq!(r.host().live_nodes(), 5);
        assert_eq!(r.host().text_content(root), "bar");
    }

    #[test]
    fn test_rebuilding_identical_tree_is_invisible() {
        let (mut r, root) = mount(sample());
        r.host_mut().take_mutations();

        r.render(sample(), root);
        r.flush().unwrap();
        assert!(visible(r.host()).is_empty());
        assert!(r.host().mutations().is_empty());
        assert_eq!(r.host().live_nodes(), 5);
    }

    #[test]
    fn test_vanished_property_is_cleared() {
        let props = Props::new().set("id", "x").set("title", "hello");
        let (mut r, root) = mount(element!("div", Some(props)));
        let div = r.host().children(root)[0];
        r.host_mut().take_mutations();

        r.render(element!("div", Some(Props::new().set("id", "x"))), root);
        r.flush().unwrap();
        assert_eq!(
            visible(r.host()),
            vec![Mutation::ClearProperty {
                node: div,
                name: "title".into()
            }]
        );
        insta::assert_snapshot!(r.host().inner_html(root), @r#"<div id="x"></div>"#);
    }

    #[test]
    fn test_removed_children_are_detached_and_freed() {
        let (mut r, root) = mount(element!("div", None, "x", "y", "z"));
        assert_eq!(r.host().live_nodes(), 5);

        r.render(element!("div", None, "x"), root);
        r.flush().unwrap();
        insta::assert_snapshot!(r.host().inner_html(root), @"<div>x</div>");
        assert_eq!(r.host().live_nodes(), 3);
        let disposed = r
            .host()
            .mutations()
            .iter()
            .filter(|m| matches!(m, Mutation::Dispose { .. }))
            .count();
        assert_eq!(disposed, 2);
    }

    #[test]
    fn test_type_change_replaces_host_node() {
        let (mut r, root) = mount(element!("div", None, element!("a", None, "link")));
        let div = r.host().children(root)[0];
        let old = r.host().children(div)[0];

        r.render(element!("div", None, element!("b", None, "bold")), root);
        r.flush().unwrap();
        insta::assert_snapshot!(r.host().inner_html(root), @"<div><b>bold</b></div>");
        assert!(!r.host().contains(old));
        assert_eq!(r.host().children(root), &[div]);
    }

    #[test]
    fn test_nothing_attached_before_commit() {
        let mut doc = Document::new();
        let root = doc.create_element("body");
        let mut r = Renderer::new(doc);
        r.render(sample(), root);

        while r.step(&zero).unwrap() == StepOutcome::Yielded {
            assert_eq!(r.host().inner_html(root), "");
        }
        insta::assert_snapshot!(r.host().inner_html(root), @r#"<div id="foo"><a>bar</a><b></b></div>"#);
    }

    #[test]
    fn test_superseded_pass_frees_detached_nodes() {
        let (mut r, root) = mount(element!("div"));
        assert_eq!(r.host().live_nodes(), 2);

        r.render(element!("div", None, element!("p"), element!("q")), root);
        // root, div, p
        for _ in 0..3 {
            r.step(&zero).unwrap();
        }
        assert_eq!(r.host().live_nodes(), 3);

        r.render(element!("div"), root);
        assert_eq!(r.host().live_nodes(), 2);
        r.flush().unwrap();
        insta::assert_snapshot!(r.host().inner_html(root), @"<div></div>");
    }

    #[test]
    fn test_superseded_pass_keeps_nodes_when_disposal_is_off() {
        let mut doc = Document::new();
        let root = doc.create_element("body");
        let config = RendererConfig::new().dispose_abandoned(false);
        let mut r = Renderer::with_config(doc, config);
        r.render(element!("div", None, element!("p")), root);
        for _ in 0..3 {
            r.step(&zero).unwrap();
        }
        r.render(element!("div"), root);
        r.flush().unwrap();
        // body, the committed div, plus the stray div and p
        assert_eq!(r.host().live_nodes(), 4);
        insta::assert_snapshot!(r.host().inner_html(root), @"<div></div>");
    }

    #[test]
    fn test_click_updates_counter() {
        let (mut r, root) = mount(element!(COUNTER, None));
        insta::assert_snapshot!(r.host().inner_html(root), @"<button>0</button>");
        let button = r.host().find_by_tag(root, "button").unwrap();
        let text = r.host().children(button)[0];
        r.host_mut().take_mutations();

        assert_eq!(r.host().dispatch(button, "click").unwrap(), 1);
        assert!(r.has_pending_work());
        r.flush().unwrap();
        insta::assert_snapshot!(r.host().inner_html(root), @"<button>1</button>");

        // Each evaluation hands out a fresh closure, so the listener is swapped.
        assert_eq!(
            visible(r.host()),
            vec![
                Mutation::RemoveListener {
                    node: button,
                    event: "click".into()
                },
                Mutation::AddListener {
                    node: button,
                    event: "click".into()
                },
                Mutation::SetProperty {
                    node: text,
                    name: NODE_VALUE.into()
                },
            ]
        );

        for _ in 0..3 {
            r.host().dispatch(button, "click").unwrap();
            r.flush().unwrap();
        }
        insta::assert_snapshot!(r.host().inner_html(root), @"<button>4</button>");
        assert_eq!(r.host().node(button).unwrap().listener_count("click"), 1);
    }

    #[test]
    fn test_sibling_components_keep_separate_state() {
        let (mut r, root) = mount(element!(Component::new("Pair", pair), None));
        let main = r.host().find_by_tag(root, "main").unwrap();
        let second = r.host().children(main)[1];

        r.host().dispatch(second, "click").unwrap();
        r.host().dispatch(second, "click").unwrap();
        r.flush().unwrap();
        insta::assert_snapshot!(
            r.host().inner_html(root),
            @"<main><button>0</button><button>2</button></main>"
        );
    }

    #[test]
    fn test_clicks_during_a_pass_restart_it() {
        let (mut r, root) = mount(element!("section", None, element!(COUNTER, None)));
        let button = r.host().find_by_tag(root, "button").unwrap();

        r.host().dispatch(button, "click").unwrap();
        r.step(&zero).unwrap();
        r.host().dispatch(button, "click").unwrap();
        r.flush().unwrap();
        insta::assert_snapshot!(r.host().inner_html(root), @"<section><button>2</button></section>");
        // body, section, button, text
        assert_eq!(r.host().live_nodes(), 4);
    }

    fn banner_and_counter(show: bool) -> Element {
        element!(
            "div",
            None,
            show.then(|| element!("h1", None, "hi")),
            element!(COUNTER, None),
        )
    }

    #[test]
    fn test_conditional_sibling_keeps_counter_state() {
        let (mut r, root) = mount(banner_and_counter(false));
        let button = r.host().find_by_tag(root, "button").unwrap();
        r.host().dispatch(button, "click").unwrap();
        r.host().dispatch(button, "click").unwrap();
        r.flush().unwrap();
        insta::assert_snapshot!(r.host().inner_html(root), @"<div><button>2</button></div>");

        r.render(banner_and_counter(true), root);
        r.flush().unwrap();
        insta::assert_snapshot!(
            r.host().inner_html(root),
            @"<div><h1>hi</h1><button>2</button></div>"
        );
        assert_eq!(r.host().find_by_tag(root, "button"), Some(button));

        r.render(banner_and_counter(false), root);
        r.flush().unwrap();
        insta::assert_snapshot!(r.host().inner_html(root), @"<div><button>2</button></div>");
        // body, div, button, text
        assert_eq!(r.host().live_nodes(), 4);
    }

    #[test]
    fn test_removed_component_frees_its_output() {
        let (mut r, root) = mount(element!(
            "div",
            None,
            element!(COUNTER, None),
            element!("i"),
        ));
        let button = r.host().find_by_tag(root, "button").unwrap();
        // body, div, button, text, i
        assert_eq!(r.host().live_nodes(), 5);
        r.host_mut().take_mutations();

        r.render(element!("div"), root);
        r.flush().unwrap();
        insta::assert_snapshot!(r.host().inner_html(root), @"<div></div>");
        assert_eq!(r.host().live_nodes(), 2);
        assert!(!r.host().contains(button));
        let div = r.host().children(root)[0];
        assert!(r.host().mutations().contains(&Mutation::RemoveChild {
            parent: div,
            child: button
        }));
        assert!(r.host().mutations().contains(&Mutation::Dispose { node: button }));
        assert_eq!(r.last_commit().unwrap().deletions, 2);
    }

    #[test]
    fn test_type_change_mid_list_keeps_order() {
        let (mut r, root) = mount(element!("div", None, element!("b"), element!("i")));
        let i = r.host().find_by_tag(root, "i").unwrap();

        r.render(element!("div", None, element!("span"), element!("i")), root);
        r.flush().unwrap();
        insta::assert_snapshot!(r.host().inner_html(root), @"<div><span></span><i></i></div>");
        assert_eq!(r.host().find_by_tag(root, "i"), Some(i));
    }

    #[test]
    fn test_html_escapes_and_boolean_attributes() {
        let props = Props::new()
            .set("disabled", true)
            .set("hidden", false)
            .set("value", "a<b & \"c\"");
        let (r, root) = mount(element!("input", Some(props)));
        insta::assert_snapshot!(
            r.host().inner_html(root),
            @r#"<input disabled value="a&lt;b &amp; &quot;c&quot;"></input>"#
        );
    }

    #[test]
    fn test_recording_mask_filters_log() {
        let mut doc = Document::with_recording(MutationKinds::TREE);
        let root = doc.create_element("body");
        let mut r = Renderer::new(doc);
        r.render(element!("p", None, "hi"), root);
        r.flush().unwrap();
        assert!(
            r.host()
                .mutations()
                .iter()
                .all(|m| matches!(m, Mutation::AppendChild { .. }))
        );
        assert_eq!(r.host().mutations().len(), 2);

        r.host_mut().set_recording(MutationKinds::empty());
        r.render(element!("p", None, "bye"), root);
        r.flush().unwrap();
        assert_eq!(r.host().mutations().len(), 2);
        insta::assert_snapshot!(r.host().inner_html(root), @"<p>bye</p>");
    }

    #[test]
    fn test_document_rejects_invalid_structure() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let span = doc.create_element("span");
        let text = doc.create_text("hi");

        assert!(matches!(
            doc.append_child(&text, &div),
            Err(DomError::TextNodeChildren(_))
        ));
        assert!(matches!(
            doc.remove_child(&div, &span),
            Err(DomError::NotAChild { .. })
        ));

        doc.append_child(&div, &span).unwrap();
        assert!(matches!(
            doc.append_child(&span, &div),
            Err(DomError::Cycle { .. })
        ));
        assert!(matches!(
            doc.append_child(&div, &div),
            Err(DomError::Cycle { .. })
        ));
    }

    #[test]
    fn test_append_moves_attached_node() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let child = doc.create_text("x");
        doc.append_child(&a, &child).unwrap();
        doc.append_child(&b, &child).unwrap();
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[child]);
        assert_eq!(doc.parent(child), Some(b));
    }

    #[test]
    fn test_dispatch_to_disposed_node_fails() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let span = doc.create_element("span");
        doc.append_child(&div, &span).unwrap();
        doc.dispose(&div);

        assert_eq!(doc.live_nodes(), 0);
        assert!(matches!(
            doc.dispatch(span, "click"),
            Err(DomError::UnknownNode(_))
        ));
        let err = doc.dispatch(div, "click").unwrap_err();
        assert!(err.to_string().starts_with("unknown node"));
    }
}

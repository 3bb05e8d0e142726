use crate::dom::{Element, Node};
use crate::error::RenderError;
use crate::events::CLICK;
use crate::state::{AppStore, CounterIntent, select_count};

use super::{Component, RenderContext, ids};

/// The counter widget. Holds no state of its own: `count` is read from the
/// store on every render, and the buttons only dispatch intents. Re-rendering
/// after a change is the provider's job.
pub struct Counter;

impl Component for Counter {
    fn render(&self, cx: &RenderContext) -> Result<Node, RenderError> {
        let store = cx.store("Counter")?;
        let count = store.select(select_count);

        let buttons = Element::new("div")
            .attr("class", "counter-actions")
            .child(intent_button(store, ids::INCREMENT, "Increment", CounterIntent::Increment))
            .child(intent_button(store, ids::DECREMENT, "Decrement", CounterIntent::Decrement))
            .child(intent_button(store, ids::RESET, "Reset", CounterIntent::Reset));

        Ok(Element::new("section")
            .attr("class", "counter")
            .child(Element::new("h2").id(ids::COUNT).text(format!("Counter: {count}")))
            .child(buttons)
            .into())
    }
}

fn intent_button(store: &AppStore, id: &str, label: &str, intent: CounterIntent) -> Element {
    let store = store.clone();
    Element::new("button")
        .id(id)
        .attr("type", "button")
        .attr("data-action", intent.action_type())
        .text(label)
        .on(CLICK, move |_| store.dispatch(intent))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::components::RenderScheduler;
    use crate::render::render_markup;
    use crate::state::{CounterState, RootState};

    fn cx_with(store: &AppStore) -> RenderContext {
        RenderContext::new(RenderScheduler::default()).with_store(store.clone())
    }

    fn click(node: &Node, id: &str) {
        let el = node.find_by_id(id).expect("button rendered");
        for handler in el.handlers_for(CLICK) {
            handler(&crate::dom::Event::click(id));
        }
    }

    #[test]
    fn shows_the_store_count() {
        let store = AppStore::new(RootState {
            counter: CounterState { count: 5 },
        });
        let node = Counter.render(&cx_with(&store)).unwrap();
        assert!(node.text_content().contains('5'));
        assert_eq!(
            node.find_by_id(ids::COUNT).map(|el| el.text_content()).as_deref(),
            Some("Counter: 5")
        );
    }

    #[test]
    fn renders_three_buttons() {
        let store = AppStore::default();
        let node = Counter.render(&cx_with(&store)).unwrap();
        assert_eq!(
            render_markup(&node),
            concat!(
                r#"<section class="counter">"#,
                r#"<h2 id="counter-count">Counter: 0</h2>"#,
                r#"<div class="counter-actions">"#,
                r#"<button id="counter-increment" type="button" data-action="counter/increment">Increment</button>"#,
                r#"<button id="counter-decrement" type="button" data-action="counter/decrement">Decrement</button>"#,
                r#"<button id="counter-reset" type="button" data-action="counter/reset">Reset</button>"#,
                r#"</div></section>"#,
            )
        );
    }

    #[test]
    fn buttons_dispatch_one_intent_each() {
        let store = AppStore::default();
        let node = Counter.render(&cx_with(&store)).unwrap();

        click(&node, ids::INCREMENT);
        click(&node, ids::INCREMENT);
        click(&node, ids::DECREMENT);
        assert_eq!(store.select(select_count), 1);
        assert_eq!(store.version(), 3);

        click(&node, ids::RESET);
        assert_eq!(store.select(select_count), 0);
    }

    #[test]
    fn reads_fresh_state_on_every_render() {
        let store = AppStore::default();
        let cx = cx_with(&store);
        store.dispatch(CounterIntent::Decrement);
        let node = Counter.render(&cx).unwrap();
        assert!(node.text_content().starts_with("Counter: -1"));
    }

    #[test]
    fn fails_without_a_provider() {
        let cx = RenderContext::new(RenderScheduler::default());
        assert_eq!(
            Counter.render(&cx).unwrap_err(),
            RenderError::MissingProvider("Counter")
        );
    }
}

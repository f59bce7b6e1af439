use super::*;
use sg_core::PluginBuilder;

fn plugin(name: &str, goal_id: &str) -> Plugin {
    PluginBuilder::default().name(name).goal_id(goal_id).build()
}

#[test]
fn push_then_pop_first_is_fifo() {
    let queue = PluginQueue::new();
    queue.push(plugin("a", "g1"));
    queue.push(plugin("b", "g1"));
    assert_eq!(queue.pop_first().unwrap().name, "a");
    assert_eq!(queue.pop_first().unwrap().name, "b");
    assert!(queue.pop_first().is_none());
}

#[test]
fn push_replaces_existing_entry_by_name() {
    let queue = PluginQueue::new();
    queue.push(plugin("a", "g1"));
    queue.push(plugin("a", "g2"));
    assert_eq!(queue.length(), 1);
    assert_eq!(queue.pop("a").unwrap().goal_id, "g2");
}

#[test]
fn pop_by_name_removes_only_that_entry() {
    let queue = PluginQueue::new();
    queue.push(plugin("a", "g1"));
    queue.push(plugin("b", "g1"));
    assert_eq!(queue.pop("a").unwrap().name, "a");
    assert_eq!(queue.length(), 1);
    assert!(queue.pop("a").is_none());
}

#[test]
fn goal_ids_collects_distinct_owning_goals() {
    let queue = PluginQueue::new();
    queue.push(plugin("a", "g1"));
    queue.push(plugin("b", "g1"));
    queue.push(plugin("c", "g2"));
    let ids = queue.goal_ids();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains("g1"));
    assert!(ids.contains("g2"));
}

#[test]
fn manual_iterator_stops_exactly_at_last_entry() {
    let queue = PluginQueue::new();
    queue.push(plugin("a", "g1"));
    queue.push(plugin("b", "g1"));

    queue.reset_iter();
    assert!(queue.more());
    assert_eq!(queue.next().unwrap().name, "a");
    assert!(queue.more());
    assert_eq!(queue.next().unwrap().name, "b");
    assert!(!queue.more());
    assert!(queue.next().is_none());
}

#[test]
fn empty_queue_iterator_never_advances() {
    let queue = PluginQueue::new();
    queue.reset_iter();
    assert!(!queue.more());
    assert!(queue.next().is_none());
}

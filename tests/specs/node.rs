mod rule_scheduling;
mod watcher_recovery;

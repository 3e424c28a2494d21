//! Topic Sequencer
//!
//! Orders a subject's topics so that every topic comes after the
//! prerequisites it names. The walk is a depth-first post-order driven by an
//! explicit stack, so long prerequisite chains never touch the thread stack.
//!
//! Cycles are tolerated: an edge back into a topic whose chain is still open
//! is skipped and reported in [`TopicSequence::ignored_cycle_edges`].
//! Prerequisites naming topics outside the set are skipped and reported in
//! [`TopicSequence::dangling_dependencies`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::Topic;

/// A prerequisite edge `topic -> dependency`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub topic: String,
    pub dependency: String,
}

impl DependencyEdge {
    fn new(topic: &str, dependency: &str) -> Self {
        Self {
            topic: topic.to_string(),
            dependency: dependency.to_string(),
        }
    }
}

/// Result of sequencing one topic set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSequence {
    pub ordered: Vec<Topic>,
    /// Edges skipped to break cycles
    pub ignored_cycle_edges: Vec<DependencyEdge>,
    /// Edges naming topics absent from the set
    pub dangling_dependencies: Vec<DependencyEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Stack frame: topic index and position of the next dependency to follow
struct Frame {
    topic: usize,
    next_dependency: usize,
}

/// Order `topics` prerequisites-first
///
/// Independent topics keep their input order. When two topics share a name
/// the first one wins and later duplicates are dropped.
pub fn sequence_topics(topics: &[Topic]) -> TopicSequence {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(topics.len());
    for (i, topic) in topics.iter().enumerate() {
        if index.contains_key(topic.name.as_str()) {
            tracing::warn!(topic = %topic.name, "Dropping duplicate topic");
            continue;
        }
        index.insert(topic.name.as_str(), i);
    }

    let mut marks = vec![Mark::Unvisited; topics.len()];
    let mut sequence = TopicSequence {
        ordered: Vec::with_capacity(index.len()),
        ..TopicSequence::default()
    };
    let mut stack: Vec<Frame> = Vec::new();

    for root in 0..topics.len() {
        if marks[root] != Mark::Unvisited || index.get(topics[root].name.as_str()) != Some(&root) {
            continue;
        }
        marks[root] = Mark::Visiting;
        stack.push(Frame {
            topic: root,
            next_dependency: 0,
        });

        while let Some(frame) = stack.last_mut() {
            let current = &topics[frame.topic];

            let Some(dep_name) = current.dependencies.get(frame.next_dependency) else {
                // Every prerequisite handled: emit in post-order
                marks[frame.topic] = Mark::Done;
                sequence.ordered.push(current.clone());
                stack.pop();
                continue;
            };
            frame.next_dependency += 1;

            match index.get(dep_name.as_str()) {
                None => {
                    sequence
                        .dangling_dependencies
                        .push(DependencyEdge::new(&current.name, dep_name));
                }
                Some(&dep) => match marks[dep] {
                    Mark::Done => {}
                    Mark::Visiting => {
                        tracing::debug!(
                            topic = %current.name,
                            dependency = %dep_name,
                            "Ignoring cyclic prerequisite edge"
                        );
                        sequence
                            .ignored_cycle_edges
                            .push(DependencyEdge::new(&current.name, dep_name));
                    }
                    Mark::Unvisited => {
                        marks[dep] = Mark::Visiting;
                        stack.push(Frame {
                            topic: dep,
                            next_dependency: 0,
                        });
                    }
                },
            }
        }
    }

    sequence
}

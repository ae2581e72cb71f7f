use indexmap::IndexMap;

use super::task::Task;

/// The ordered in-memory mapping of task identifier to task.
///
/// Iteration order is display order. Identifiers come from a counter that
/// only moves forward, so an identifier freed by a delete is not handed out
/// again while the list is alive. Across restarts the store reserves the
/// identifiers its recovery log records as deleted.
#[derive(Debug, Clone)]
pub struct TaskList {
    tasks: IndexMap<String, Task>,
    next_id: u64,
}

impl TaskList {
    pub fn new() -> Self {
        Self::from_map(IndexMap::new())
    }

    /// Wrap a loaded mapping, seeding the counter past every numeric key
    /// and past the task count.
    pub fn from_map(tasks: IndexMap<String, Task>) -> Self {
        let highest = tasks
            .keys()
            .filter_map(|k| k.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let next_id = highest.max(tasks.len() as u64) + 1;
        TaskList { tasks, next_id }
    }

    pub fn as_map(&self) -> &IndexMap<String, Task> {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    /// Task at a display position
    pub fn get_index(&self, index: usize) -> Option<(&str, &Task)> {
        self.tasks.get_index(index).map(|(id, t)| (id.as_str(), t))
    }

    /// Display position of a task
    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.get_index_of(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Task)> {
        self.tasks.iter().map(|(id, t)| (id.as_str(), t))
    }

    /// Never hand out `id` or anything below it.
    pub fn reserve_through(&mut self, id: u64) {
        self.next_id = self.next_id.max(id.saturating_add(1));
    }

    fn next_free(&self) -> u64 {
        let mut n = self.next_id;
        while self.tasks.contains_key(&n.to_string()) {
            n += 1;
        }
        n
    }

    /// Append a task under a fresh identifier and return that identifier.
    pub fn push(&mut self, task: Task) -> String {
        let n = self.next_free();
        self.next_id = n + 1;
        let id = n.to_string();
        self.tasks.insert(id.clone(), task);
        id
    }

    /// Remove a task, keeping the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        self.tasks.shift_remove(id)
    }

    /// Stable reorder by a comparison on the task records.
    pub fn sort_by<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&Task, &Task) -> std::cmp::Ordering,
    {
        self.tasks.sort_by(|_, a, _, b| cmp(a, b));
    }
}

impl Default for TaskList {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for TaskList {
    /// Two lists are equal when they hold the same tasks in the same order;
    /// the id counter is bookkeeping and does not take part.
    fn eq(&self, other: &Self) -> bool {
        self.tasks.len() == other.tasks.len()
            && self
                .tasks
                .iter()
                .zip(other.tasks.iter())
                .all(|(a, b)| a == b)
    }
}

impl Eq for TaskList {}

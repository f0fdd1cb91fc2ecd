/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

use std::{fmt, time::Duration};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum TaskCategory {
    Default,
    EfisVectors,
}

pub type TaskCallback<C> = Box<dyn FnOnce(&mut C)>;

struct Task<C> {
    category: TaskCategory,
    remaining: Duration,
    callback: TaskCallback<C>,
}

/// deferred work that runs on a later tick. Callbacks get mutable access to the context `C`
/// that is passed into [`TaskQueue::update`]. Tasks that become due in the same update run in the
/// order in which they were enqueued
pub struct TaskQueue<C> {
    tasks: Vec<Task<C>>,
}

impl<C> TaskQueue<C> {
    pub fn new ()->Self { TaskQueue { tasks: Vec::new() } }

    pub fn enqueue<F> (&mut self, category: TaskCategory, delay: Duration, callback: F) where F: FnOnce(&mut C) + 'static {
        self.tasks.push( Task { category, remaining: delay, callback: Box::new( callback) });
    }

    pub fn len (&self)->usize { self.tasks.len() }
    pub fn is_empty (&self)->bool { self.tasks.is_empty() }

    pub fn pending_in_category (&self, category: TaskCategory)->usize {
        self.tasks.iter().filter( |t| t.category == category).count()
    }

    /// drop all pending tasks of `category` without running them. Returns the number of dropped tasks
    pub fn cancel_all_in_category (&mut self, category: TaskCategory)->usize {
        let n = self.tasks.len();
        self.tasks.retain( |t| t.category != category);
        n - self.tasks.len()
    }

    /// advance time by `delta` and run all tasks that became due
    pub fn update (&mut self, delta: Duration, ctx: &mut C)->usize {
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity( self.tasks.len());

        for mut task in self.tasks.drain(..) {
            task.remaining = task.remaining.saturating_sub( delta);
            if task.remaining.is_zero() { due.push( task) } else { pending.push( task) }
        }
        self.tasks = pending;

        let n = due.len();
        for task in due {
            (task.callback)( ctx);
        }
        n
    }
}

impl<C> Default for TaskQueue<C> {
    fn default ()->Self { TaskQueue::new() }
}

impl<C> fmt::Debug for TaskQueue<C> {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!( f, "TaskQueue({} tasks)", self.tasks.len())
    }
}

//! Scopes: code re-run after the values it depends on change.
//!
//! A scope is identified by the type of its closure plus an optional key.
//! Entering the same closure again reuses its id, so every value it ever
//! captured triggers one shared re-run.

use std::any::TypeId;
use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rustc_hash::FxHasher;

use super::{ScopeFn, ScopeId, Tweakable};

impl Tweakable {
    /// Run `f` once, and again after every [`update()`](Self::update) that
    /// changes a value first evaluated inside it.
    ///
    /// Annotations executing for the first time during this call capture
    /// the scope; later executions leave their capture alone. Scopes nest
    /// and the innermost one wins. The closure is kept only if something
    /// captured it. On a disabled engine `f` simply runs once.
    ///
    /// Every call with the same closure (the same `|..| { .. }` expression
    /// in the source) is the same scope: one `update()` re-runs it once,
    /// with the captures of its latest call. Use
    /// [`scope_keyed`](Self::scope_keyed) to tell apart calls that share a
    /// closure.
    ///
    /// ```no_run
    /// # use tweakable::Tweakable;
    /// # let mut engine = Tweakable::new()?;
    /// engine.enable();
    /// engine.scope(|engine| {
    ///     let radius = engine.annotate(file!(), line!(), 0, 4.0f32);
    ///     println!("area: {}", std::f32::consts::PI * radius * radius);
    /// });
    /// # Ok::<(), tweakable::EngineError>(())
    /// ```
    pub fn scope<F>(&mut self, f: F)
    where
        F: FnMut(&mut Tweakable) + 'static,
    {
        self.enter_scope(TypeId::of::<F>(), 0, f);
    }

    /// Like [`scope`](Self::scope), with `key` as part of the identity.
    ///
    /// ```no_run
    /// # use tweakable::Tweakable;
    /// # let mut engine = Tweakable::new()?;
    /// engine.enable();
    /// for player in 0..2usize {
    ///     engine.scope_keyed(player, move |engine| {
    ///         let hp = engine.annotate(file!(), line!(), player, 100);
    ///         println!("player {player}: {hp}");
    ///     });
    /// }
    /// # Ok::<(), tweakable::EngineError>(())
    /// ```
    pub fn scope_keyed<K, F>(&mut self, key: K, f: F)
    where
        K: Hash,
        F: FnMut(&mut Tweakable) + 'static,
    {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        self.enter_scope(TypeId::of::<F>(), hasher.finish(), f);
    }

    fn enter_scope<F>(&mut self, closure: TypeId, key: u64, mut f: F)
    where
        F: FnMut(&mut Tweakable) + 'static,
    {
        if !self.is_enabled() {
            f(self);
            return;
        }
        let Some(data) = self.data.as_mut() else {
            return;
        };

        let next_scope = &mut self.next_scope;
        let id = *data.scope_keys.entry((closure, key)).or_insert_with(|| {
            let id = ScopeId(*next_scope);
            *next_scope += 1;
            id
        });
        data.scope_stack.push(id);

        let callback: ScopeFn = Rc::new(RefCell::new(f));
        {
            let mut f = callback.borrow_mut();
            (&mut *f)(self);
        }

        // The closure may have disabled or re-enabled the engine.
        let Some(data) = self.data.as_mut() else {
            return;
        };
        if data.scope_stack.last() == Some(&id) {
            data.scope_stack.pop();
        }
        if data.captured.contains(&id) {
            data.scopes.insert(id, callback);
        }
    }

    /// Innermost scope currently running its first execution.
    pub fn current_scope(&self) -> Option<ScopeId> {
        self.data.as_ref()?.scope_stack.last().copied()
    }
}

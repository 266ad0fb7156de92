//! Per-instant evaluation context with memoized formulas
//!
//! A [`SkyContext`] pins down the instant and the observer. Everything
//! derived from those two inputs is computed through `get*`, which runs a
//! formula at most once per distinct argument list and hands out clones of
//! the cached result afterwards. Changing the instant, the location or the
//! precision preference empties the cache.

pub mod formulas;

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use log::trace;

use crate::aberrationlib::AberrationElements;
use crate::config::CalculationSettings;
use crate::constants::DAY_S;
use crate::earthlib::GeoLocation;
use crate::nutationlib::NutationElements;

/// Identity of a memoized formula: its address plus its full signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FormulaKey {
    address: usize,
    signature: TypeId,
}

impl FormulaKey {
    fn of<F: 'static>(address: usize) -> Self {
        Self {
            address,
            signature: TypeId::of::<F>(),
        }
    }
}

struct CacheEntry {
    args: Box<dyn Any + Send>,
    value: Box<dyn Any + Send>,
}

/// Evaluation scope for one instant and one observer
pub struct SkyContext {
    julian_day: f64,
    location: GeoLocation,
    settings: CalculationSettings,
    cache: RefCell<HashMap<FormulaKey, Vec<CacheEntry>>>,
}

impl SkyContext {
    /// Context for a Julian Day in UT with default settings
    pub fn new(julian_day: f64, location: GeoLocation) -> Self {
        Self::with_settings(julian_day, location, CalculationSettings::default())
    }

    /// Context whose dynamical time is `jde`
    ///
    /// ΔT is evaluated at `jde` itself; it changes by far less than a
    /// millisecond over the difference between the two scales.
    pub fn from_jde(jde: f64, location: GeoLocation) -> Self {
        Self::new(jde - crate::time::delta_t(jde) / DAY_S, location)
    }

    pub fn with_settings(
        julian_day: f64,
        location: GeoLocation,
        settings: CalculationSettings,
    ) -> Self {
        Self {
            julian_day,
            location,
            settings,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Fresh context at another instant, same observer and settings
    pub fn at(&self, julian_day: f64) -> SkyContext {
        Self::with_settings(julian_day, self.location, self.settings.clone())
    }

    /// Julian Day (UT) of this context
    pub fn julian_day(&self) -> f64 {
        self.julian_day
    }

    pub fn location(&self) -> &GeoLocation {
        &self.location
    }

    pub fn settings(&self) -> &CalculationSettings {
        &self.settings
    }

    /// Whether theories should use their full series
    pub fn high_precision(&self) -> bool {
        !self.settings.prefer_fast_calculation
    }

    pub fn set_julian_day(&mut self, julian_day: f64) {
        self.julian_day = julian_day;
        self.clear_cache();
    }

    pub fn set_location(&mut self, location: GeoLocation) {
        self.location = location;
        self.clear_cache();
    }

    pub fn set_prefer_fast_calculation(&mut self, fast: bool) {
        self.settings.prefer_fast_calculation = fast;
        self.clear_cache();
    }

    /// Drop every cached result
    pub fn clear_cache(&mut self) {
        self.cache.get_mut().clear();
    }

    /// Number of cached results across all formulas
    pub fn cache_len(&self) -> usize {
        self.cache.borrow().values().map(Vec::len).sum()
    }

    /// Evaluate a formula that depends on the context only
    pub fn get<R>(&self, formula: fn(&SkyContext) -> R) -> R
    where
        R: Clone + Send + 'static,
    {
        let key = FormulaKey::of::<fn(&SkyContext) -> R>(formula as usize);
        self.memoize(key, (), |ctx, _| formula(ctx))
    }

    /// Evaluate a formula with one extra argument
    pub fn get1<A, R>(&self, formula: fn(&SkyContext, A) -> R, a: A) -> R
    where
        A: PartialEq + Clone + Send + 'static,
        R: Clone + Send + 'static,
    {
        let key = FormulaKey::of::<fn(&SkyContext, A) -> R>(formula as usize);
        self.memoize(key, a, |ctx, a| formula(ctx, a.clone()))
    }

    /// Evaluate a formula with two extra arguments
    pub fn get2<A, B, R>(&self, formula: fn(&SkyContext, A, B) -> R, a: A, b: B) -> R
    where
        A: PartialEq + Clone + Send + 'static,
        B: PartialEq + Clone + Send + 'static,
        R: Clone + Send + 'static,
    {
        let key = FormulaKey::of::<fn(&SkyContext, A, B) -> R>(formula as usize);
        self.memoize(key, (a, b), |ctx, (a, b)| formula(ctx, a.clone(), b.clone()))
    }

    /// Evaluate a formula with three extra arguments
    pub fn get3<A, B, C, R>(
        &self,
        formula: fn(&SkyContext, A, B, C) -> R,
        a: A,
        b: B,
        c: C,
    ) -> R
    where
        A: PartialEq + Clone + Send + 'static,
        B: PartialEq + Clone + Send + 'static,
        C: PartialEq + Clone + Send + 'static,
        R: Clone + Send + 'static,
    {
        let key = FormulaKey::of::<fn(&SkyContext, A, B, C) -> R>(formula as usize);
        self.memoize(key, (a, b, c), |ctx, (a, b, c)| {
            formula(ctx, a.clone(), b.clone(), c.clone())
        })
    }

    /// Evaluate a closure at most once per tag type and argument list
    ///
    /// For quantities of values that cannot be passed as formula arguments,
    /// such as trait objects. `args` must tell apart everything the closure
    /// may be evaluated for under the same tag.
    pub fn get_tagged<T, A, R, F>(&self, args: A, compute: F) -> R
    where
        T: 'static,
        A: PartialEq + Send + 'static,
        R: Clone + Send + 'static,
        F: FnOnce(&SkyContext) -> R,
    {
        let key = FormulaKey::of::<(T, A, R)>(0);
        self.memoize(key, args, |ctx, _| compute(ctx))
    }

    fn lookup<A, R>(&self, key: &FormulaKey, args: &A) -> Option<R>
    where
        A: PartialEq + 'static,
        R: Clone + 'static,
    {
        let cache = self.cache.borrow();
        cache
            .get(key)?
            .iter()
            .find(|entry| entry.args.downcast_ref::<A>() == Some(args))
            .and_then(|entry| entry.value.downcast_ref::<R>())
            .cloned()
    }

    fn memoize<A, R, F>(&self, key: FormulaKey, args: A, compute: F) -> R
    where
        A: PartialEq + Send + 'static,
        R: Clone + Send + 'static,
        F: FnOnce(&SkyContext, &A) -> R,
    {
        if let Some(value) = self.lookup::<A, R>(&key, &args) {
            return value;
        }

        trace!(
            "cache miss for formula {:#x} at JD {}",
            key.address,
            self.julian_day
        );
        // The formula may re-enter the context, so no borrow is held here
        let value = compute(self, &args);

        self.cache
            .borrow_mut()
            .entry(key)
            .or_default()
            .push(CacheEntry {
                args: Box::new(args),
                value: Box::new(value.clone()),
            });
        value
    }

    /// ΔT = TT − UT in seconds
    pub fn delta_t(&self) -> f64 {
        self.get(formulas::delta_t)
    }

    /// Julian Ephemeris Day (TT) of this context
    pub fn jde(&self) -> f64 {
        self.get(formulas::jde)
    }

    pub fn nutation(&self) -> NutationElements {
        self.get(formulas::nutation)
    }

    pub fn mean_obliquity(&self) -> f64 {
        self.get(formulas::mean_obliquity)
    }

    /// True obliquity of the ecliptic, degrees
    pub fn epsilon(&self) -> f64 {
        self.get(formulas::true_obliquity)
    }

    pub fn aberration(&self) -> AberrationElements {
        self.get(formulas::aberration)
    }

    /// Mean sidereal time at Greenwich, degrees
    pub fn mean_sidereal_time(&self) -> f64 {
        self.get(formulas::mean_sidereal_time)
    }

    /// Apparent sidereal time at Greenwich, degrees
    pub fn sidereal_time(&self) -> f64 {
        self.get(formulas::apparent_sidereal_time)
    }

    /// Julian Day of the local midnight starting the observer's civil day
    pub fn local_midnight(&self) -> f64 {
        self.get(formulas::local_midnight)
    }
}

impl Debug for SkyContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkyContext")
            .field("julian_day", &self.julian_day)
            .field("location", &self.location)
            .field("settings", &self.settings)
            .field("cached", &self.cache_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    thread_local! {
        static CALLS: Cell<usize> = const { Cell::new(0) };
    }

    fn calls() -> usize {
        CALLS.with(Cell::get)
    }

    fn counted_square(ctx: &SkyContext, x: i32) -> f64 {
        CALLS.with(|c| c.set(c.get() + 1));
        ctx.julian_day() + f64::from(x * x)
    }

    fn counted_sum(_ctx: &SkyContext, x: i32, y: i32) -> i32 {
        CALLS.with(|c| c.set(c.get() + 1));
        x + y
    }

    fn greenwich() -> GeoLocation {
        GeoLocation::new(0.0, 51.4769)
    }

    #[test]
    fn test_same_arguments_evaluate_once() {
        let ctx = SkyContext::new(2451545.0, greenwich());
        let before = calls();
        let a = ctx.get1(counted_square, 3);
        let b = ctx.get1(counted_square, 3);
        assert_eq!(a, b);
        assert_eq!(calls() - before, 1);

        ctx.get1(counted_square, 4);
        assert_eq!(calls() - before, 2);
        assert_eq!(ctx.cache_len(), 2);
    }

    #[test]
    fn test_argument_tuples_are_keyed() {
        let ctx = SkyContext::new(2451545.0, greenwich());
        let before = calls();
        assert_eq!(ctx.get2(counted_sum, 1, 2), 3);
        assert_eq!(ctx.get2(counted_sum, 2, 1), 3);
        assert_eq!(ctx.get2(counted_sum, 1, 2), 3);
        assert_eq!(calls() - before, 2);
    }

    struct Doubled;

    #[test]
    fn test_tagged_closures() {
        let ctx = SkyContext::new(2451545.0, greenwich());
        let evaluations = Cell::new(0);
        let doubled = |x: i32| {
            ctx.get_tagged::<Doubled, _, _, _>(x, |_| {
                evaluations.set(evaluations.get() + 1);
                2 * x
            })
        };
        assert_eq!(doubled(2), 4);
        assert_eq!(doubled(2), 4);
        assert_eq!(doubled(3), 6);
        assert_eq!(evaluations.get(), 2);

        // Another tag never sees these entries
        let other = ctx.get_tagged::<(), _, _, _>(2, |_| -1);
        assert_eq!(other, -1);
    }

    #[test]
    fn test_mutation_clears_cache() {
        let mut ctx = SkyContext::new(2451545.0, greenwich());
        let before = calls();
        assert_relative_eq!(ctx.get1(counted_square, 2), 2451549.0);

        ctx.set_julian_day(2451546.0);
        assert_eq!(ctx.cache_len(), 0);
        assert_relative_eq!(ctx.get1(counted_square, 2), 2451550.0);
        assert_eq!(calls() - before, 2);

        ctx.set_location(GeoLocation::new(-10.0, 0.0));
        assert_eq!(ctx.cache_len(), 0);
        ctx.get1(counted_square, 2);
        ctx.set_prefer_fast_calculation(true);
        assert_eq!(ctx.cache_len(), 0);
        assert_eq!(calls() - before, 3);
    }

    #[test]
    fn test_nested_formulas() {
        let ctx = SkyContext::new(2446895.5, greenwich());
        let theta = ctx.sidereal_time();
        // sidereal time pulls in nutation, obliquity, jde and ΔT
        assert!(ctx.cache_len() >= 5);
        assert_relative_eq!(theta, ctx.sidereal_time());
    }

    #[test]
    fn test_at_keeps_observer() {
        let ctx = SkyContext::new(2451545.0, greenwich().with_utc_offset(1.0));
        let later = ctx.at(2451546.0);
        assert_eq!(later.location(), ctx.location());
        assert_eq!(later.cache_len(), 0);
        assert_relative_eq!(later.julian_day(), 2451546.0);
    }

    #[test]
    fn test_from_jde_recovers_dynamical_time() {
        let ctx = SkyContext::from_jde(2448908.5, greenwich());
        assert_relative_eq!(ctx.jde(), 2448908.5, epsilon = 1e-8);
        assert!(ctx.julian_day() < 2448908.5);
    }
}

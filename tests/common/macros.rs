/// Asserts that every live agent sits inside the world's current swim box.
#[macro_export]
macro_rules! assert_all_inside {
    ($world:expr) => {
        let swim_box = *$world.swim_box();
        for agent in $world.snapshots() {
            assert!(
                agent.position.cmpge(swim_box.min).all() && agent.position.cmple(swim_box.max).all(),
                "Agent {} at {:?} escaped {:?}",
                agent.id,
                agent.position,
                swim_box
            );
        }
    };
}

/// Asserts that every live agent's speed is inside its allowed window.
#[macro_export]
macro_rules! assert_speeds_bounded {
    ($world:expr) => {
        for agent in $world.snapshots() {
            let floor = agent.speed_min.min(0.9 * agent.speed_max);
            let speed = agent.velocity.length();
            assert!(
                speed >= floor - 1e-3 && speed <= agent.speed_max + 1e-3,
                "Agent {} speed {} outside [{}, {}]",
                agent.id,
                speed,
                floor,
                agent.speed_max
            );
            assert!(speed > 0.0, "Agent {} stopped", agent.id);
        }
    };
}

/// Asserts that the total population count matches the expected value.
#[macro_export]
macro_rules! assert_population {
    ($world:expr, $count:expr) => {
        assert_eq!($world.population(), $count, "Population count mismatch");
    };
}

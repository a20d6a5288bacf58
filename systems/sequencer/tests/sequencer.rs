use hex_treasure_core::{CellCoord, EffectState, HuntError, TerrainKind};
use hex_treasure_system_sequencer::TreasureSequencer;
use hex_treasure_world::{Expedition, GridMap};

fn grid(rows: &[&str]) -> GridMap {
    let rows = rows
        .iter()
        .map(|row| {
            row.split_whitespace()
                .map(|token| token.parse::<TerrainKind>().expect("known token"))
                .collect()
        })
        .collect();
    GridMap::new(rows).expect("grid is rectangular")
}

fn expedition(rows: &[&str], start: (u32, u32), goals: &[(u32, u32)]) -> Expedition {
    Expedition::new(
        grid(rows),
        CellCoord::new(start.0, start.1),
        goals
            .iter()
            .map(|&(column, row)| CellCoord::new(column, row))
            .collect(),
    )
    .expect("expedition is valid")
}

fn reference_expedition() -> Expedition {
    expedition(
        &[
            "p . . . r1 . . . . .",
            ". t2 . t4 g . t3 . o .",
            ". . o . o . . r2 t1 .",
            "o r1 . o . t3 o g . g",
            ". . t2 g o . o o . .",
            ". . . . . r2 . . . .",
        ],
        (0, 0),
        &[(3, 4), (4, 1), (7, 3), (9, 3)],
    )
}

#[test]
fn no_treasures_yields_an_empty_report() {
    let expedition = expedition(&["p . ."], (0, 0), &[]);
    let initial = expedition.map().clone();

    let report = TreasureSequencer::new(expedition)
        .run()
        .expect("nothing to search for");

    assert!(report.phases().is_empty());
    assert_eq!(report.total_cost(), 0.0);
    assert!(report.concatenated_path().is_empty());
    assert_eq!(report.final_map(), &initial);
    assert_eq!(report.effects(), EffectState::neutral());
}

#[test]
fn consumed_reward_is_not_applied_twice() {
    let expedition = expedition(&[". r1 p . ."], (2, 0), &[(0, 0), (4, 0)]);

    let report = TreasureSequencer::new(expedition)
        .run()
        .expect("both treasures are reachable");

    let phases = report.phases();
    assert_eq!(phases.len(), 2);
    assert_eq!(phases[0].goal(), CellCoord::new(0, 0));
    assert_eq!(phases[0].result().energy_cost(), 1.5);
    assert_eq!(phases[0].result().triggers().len(), 1);
    assert_eq!(phases[1].goal(), CellCoord::new(4, 0));
    assert_eq!(phases[1].result().energy_cost(), 2.0);
    assert!(phases[1].result().triggers().is_empty());

    assert_eq!(report.total_energy(), 3.5);
    assert_eq!(report.total_steps(), 6.0);
    assert_eq!(report.effects().reward_energy(), 0.5);
    assert_eq!(
        report.final_map().terrain_at(CellCoord::new(1, 0)),
        TerrainKind::Visited
    );
    assert_eq!(
        report.final_map().base_terrain_at(CellCoord::new(1, 0)),
        TerrainKind::RewardEnergy
    );
}

#[test]
fn totals_add_up_across_phases() {
    let expedition = expedition(&["p r1 g . g"], (0, 0), &[(2, 0), (4, 0)]);

    let report = TreasureSequencer::new(expedition)
        .run()
        .expect("both treasures are reachable");

    assert_eq!(report.total_energy(), 2.5);
    assert_eq!(report.total_steps(), 4.0);
    assert_eq!(report.total_cost(), 6.5);
    let phase_sum: f64 = report
        .phases()
        .iter()
        .map(|phase| phase.result().total_cost())
        .sum();
    assert_eq!(phase_sum, report.total_cost());
    assert_eq!(
        report.concatenated_path(),
        (0..5).map(|column| CellCoord::new(column, 0)).collect::<Vec<_>>()
    );
}

#[test]
fn phase_maps_mark_the_walked_path() {
    let expedition = expedition(&["p . g . g"], (0, 0), &[(2, 0), (4, 0)]);
    let mut sequencer = TreasureSequencer::new(expedition);

    let first = sequencer
        .step()
        .expect("first treasure is reachable")
        .expect("a treasure remains");
    assert_eq!(first.map().terrain_at(CellCoord::new(0, 0)), TerrainKind::Visited);
    assert_eq!(first.map().terrain_at(CellCoord::new(1, 0)), TerrainKind::Visited);
    assert_eq!(first.map().terrain_at(CellCoord::new(2, 0)), TerrainKind::Occupied);
    assert_eq!(first.map().terrain_at(CellCoord::new(3, 0)), TerrainKind::Empty);
    assert_eq!(sequencer.position(), CellCoord::new(2, 0));
    assert_eq!(sequencer.remaining_goals(), &[CellCoord::new(4, 0)]);

    let second = sequencer
        .step()
        .expect("second treasure is reachable")
        .expect("a treasure remains");
    assert_eq!(second.map().terrain_at(CellCoord::new(2, 0)), TerrainKind::Visited);
    assert_eq!(second.map().terrain_at(CellCoord::new(4, 0)), TerrainKind::Occupied);

    assert!(sequencer.step().expect("nothing left").is_none());
}

#[test]
fn effects_carry_into_the_next_phase() {
    let expedition = expedition(&["p t2 g . . g"], (0, 0), &[(2, 0), (5, 0)]);
    let mut sequencer = TreasureSequencer::new(expedition);

    let first = sequencer
        .step()
        .expect("first treasure is reachable")
        .expect("a treasure remains");
    assert_eq!(first.result().step_cost(), 3.0);
    assert_eq!(sequencer.effects().trap_step(), 2.0);

    let second = sequencer
        .step()
        .expect("second treasure is reachable")
        .expect("a treasure remains");
    assert_eq!(second.result().step_cost(), 6.0);
    assert_eq!(second.result().energy_cost(), 3.0);
}

#[test]
fn walled_treasure_halts_the_whole_run() {
    let rows = [
        "p . . . .",
        ". . o o .",
        ". o g t4 .",
        ". o o o .",
        ". . . . .",
    ];
    let result = TreasureSequencer::new(expedition(&rows, (0, 0), &[(1, 0), (2, 2)])).run();
    assert_eq!(
        result,
        Err(HuntError::UnreachableTarget {
            start: CellCoord::new(1, 0),
            target: CellCoord::new(2, 2),
        })
    );
}

#[test]
fn failed_phase_leaves_the_sequencer_untouched() {
    let rows = [
        "p . . . .",
        ". . o o .",
        ". o g t4 .",
        ". o o o .",
        ". . . . .",
    ];
    let mut sequencer = TreasureSequencer::new(expedition(&rows, (0, 0), &[(2, 2)]));
    let before = sequencer.map().clone();

    assert!(matches!(
        sequencer.step(),
        Err(HuntError::UnreachableTarget { .. })
    ));
    assert_eq!(sequencer.map(), &before);
    assert_eq!(sequencer.position(), CellCoord::new(0, 0));
    assert_eq!(sequencer.remaining_goals(), &[CellCoord::new(2, 2)]);
}

#[test]
fn reference_expedition_collects_every_treasure() {
    let report = TreasureSequencer::new(reference_expedition())
        .run()
        .expect("every treasure is reachable");

    let order: Vec<_> = report.phases().iter().map(|phase| phase.goal()).collect();
    assert_eq!(
        order,
        vec![
            CellCoord::new(4, 1),
            CellCoord::new(3, 4),
            CellCoord::new(7, 3),
            CellCoord::new(9, 3),
        ]
    );

    let path = report.concatenated_path();
    assert_eq!(path.first(), Some(&CellCoord::new(0, 0)));
    assert_eq!(path.last(), Some(&CellCoord::new(9, 3)));
    for pair in path.windows(2) {
        assert!(
            report
                .final_map()
                .neighbors(pair[0])
                .any(|(_, cell)| cell == pair[1]),
            "{} and {} are not adjacent",
            pair[0],
            pair[1]
        );
    }

    let final_map = report.final_map();
    for goal in [
        CellCoord::new(4, 1),
        CellCoord::new(3, 4),
        CellCoord::new(7, 3),
    ] {
        assert_eq!(final_map.terrain_at(goal), TerrainKind::Visited);
    }
    assert_eq!(
        final_map.terrain_at(CellCoord::new(9, 3)),
        TerrainKind::Occupied
    );
    assert!(report.total_energy() > 0.0);
    assert!(report.total_steps() > 0.0);
}

#[test]
fn identical_expeditions_replay_identically() {
    let first = TreasureSequencer::new(reference_expedition())
        .run()
        .expect("every treasure is reachable");
    let second = TreasureSequencer::new(reference_expedition())
        .run()
        .expect("every treasure is reachable");
    assert_eq!(first, second);
}

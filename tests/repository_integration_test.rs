// ==========================================
// Repository 层集成测试
// ==========================================
// 测试范围:
// 1. 击杀计数原子累加
// 2. 分配规则读写、变体去重、解锁目录
// 3. 屏蔽表
// 4. 玩家档案持久化
// ==========================================


use std::sync::{Arc, Mutex};

use slayer_tracker::db::{init_schema, open_sqlite_connection};
use slayer_tracker::domain::{
    Location, LocationRestriction, NewAssignmentRule, PlayerProfile, SlayerMaster,
    UNLIMITED_KILL_CAP,
};
use slayer_tracker::repository::{
    BlockedTaskRepository, MonsterRepository, NewMonster, PlayerProfileRepository,
    ProfileDefaults, RepositoryError, SlayerMasterRepository, TaskRepository,
};
use tempfile::NamedTempFile;
use test_helpers::create_test_db;

struct Repos {
    master_repo: SlayerMasterRepository,
    task_repo: TaskRepository,
    monster_repo: MonsterRepository,
    blocked_repo: BlockedTaskRepository,
    player_repo: PlayerProfileRepository,
    _temp_file: NamedTempFile,
}

fn setup() -> Repos {
    let (temp_file, db_path) = create_test_db().unwrap();
    let conn = open_sqlite_connection(&db_path).unwrap();
    init_schema(&conn).unwrap();
    let conn = Arc::new(Mutex::new(conn));

    Repos {
        master_repo: SlayerMasterRepository::from_connection(conn.clone()),
        task_repo: TaskRepository::from_connection(conn.clone()),
        monster_repo: MonsterRepository::from_connection(conn.clone()),
        blocked_repo: BlockedTaskRepository::from_connection(conn.clone()),
        player_repo: PlayerProfileRepository::from_connection(conn),
        _temp_file: temp_file,
    }
}

fn master(name: &str, is_location_based: bool) -> SlayerMaster {
    SlayerMaster {
        id: 0,
        name: name.to_string(),
        combat_requirement: 3,
        slayer_requirement: 1,
        points_per_task: 15,
        points_per_tenth_task: 75,
        is_location_based,
    }
}

fn rule(master_id: i64, task_id: i64, restriction: Option<LocationRestriction>) -> NewAssignmentRule {
    NewAssignmentRule {
        master_id,
        task_id,
        weight: 8.0,
        min_amount: 20,
        max_amount: 40,
        quest_unlocks: vec![],
        slayer_unlock: None,
        location_restriction: restriction,
    }
}

// ==========================================
// 击杀计数
// ==========================================

#[test]
fn test_record_kills_accumulates() {
    let repos = setup();
    let task_id = repos.task_repo.add_task("Cows", 1).unwrap();
    let cow = repos
        .monster_repo
        .add_monster(&NewMonster {
            name: "Cow".to_string(),
            kill_cap: UNLIMITED_KILL_CAP,
            task_ids: vec![task_id],
            locations: vec![],
        })
        .unwrap();

    assert_eq!(repos.monster_repo.record_kills(cow, 3).unwrap(), 3);
    assert_eq!(repos.monster_repo.record_kills(cow, 4).unwrap(), 7);

    let monster = repos.monster_repo.find_by_id(cow).unwrap().unwrap();
    assert_eq!(monster.kill_count, 7);
    assert!(monster.is_unlimited());
    assert!(monster.added_at.is_some());
}

#[test]
fn test_kills_beyond_cap_give_negative_remaining() {
    let repos = setup();
    let task_id = repos.task_repo.add_task("Bears", 1).unwrap();
    let bear = repos
        .monster_repo
        .add_monster(&NewMonster {
            name: "Black bear".to_string(),
            kill_cap: 10,
            task_ids: vec![task_id],
            locations: vec![Location::new("Varrock", false)],
        })
        .unwrap();
    repos.monster_repo.record_kills(bear, 15).unwrap();

    let summaries = repos.monster_repo.list_summaries().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].remaining, -5);
    assert_eq!(summaries[0].tasks.len(), 1);
    assert_eq!(summaries[0].tasks[0].name, "Bears");
    assert_eq!(summaries[0].locations, vec![Location::new("Varrock", false)]);
}

#[test]
fn test_update_kill_cap_unknown_monster() {
    let repos = setup();
    let err = repos.monster_repo.update_kill_cap(42, 100).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[test]
fn test_find_by_task_loads_locations() {
    let repos = setup();
    let task_id = repos.task_repo.add_task("Hellhounds", 1).unwrap();
    repos
        .monster_repo
        .add_monster(&NewMonster {
            name: "Hellhound".to_string(),
            kill_cap: UNLIMITED_KILL_CAP,
            task_ids: vec![task_id],
            locations: vec![
                Location::new("Taverley Dungeon", false),
                Location::new("Wilderness", true),
            ],
        })
        .unwrap();

    let monsters = repos.monster_repo.find_by_task(task_id).unwrap();
    assert_eq!(monsters.len(), 1);
    assert!(monsters[0].has_wilderness_location());
    assert!(monsters[0].has_location_named("Taverley Dungeon"));
    assert!(!monsters[0].has_location_named("taverley dungeon"));
}

// ==========================================
// 分配规则
// ==========================================

#[test]
fn test_assignment_variants_are_distinct_by_restriction() {
    let repos = setup();
    let konar = repos.master_repo.insert(&master("Konar", true)).unwrap();
    let task_id = repos.task_repo.add_task("Hellhounds", 1).unwrap();

    assert!(repos.task_repo.add_assignment(&rule(konar, task_id, None)).unwrap());
    assert!(!repos.task_repo.add_assignment(&rule(konar, task_id, None)).unwrap());
    assert!(repos
        .task_repo
        .add_assignment(&rule(konar, task_id, Some(LocationRestriction::Wilderness)))
        .unwrap());
    assert!(repos
        .task_repo
        .add_assignment(&rule(
            konar,
            task_id,
            Some(LocationRestriction::Named("Taverley Dungeon".to_string()))
        ))
        .unwrap());

    let rules = repos.task_repo.find_rules_by_master(konar).unwrap();
    assert_eq!(rules.len(), 3);
    assert!(rules.iter().any(|r| r.location_restriction.is_none()));
    assert!(rules
        .iter()
        .any(|r| r.location_restriction == Some(LocationRestriction::Wilderness)));
    assert!(rules.iter().all(|r| r.task.name == "Hellhounds"));
}

#[test]
fn test_add_task_is_idempotent() {
    let repos = setup();
    let first = repos.task_repo.add_task("Bears", 1).unwrap();
    let second = repos.task_repo.add_task("Bears", 5).unwrap();
    assert_eq!(first, second);

    let tasks = repos.task_repo.list_tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].slayer_requirement, 1);
}

#[test]
fn test_list_unlocks_sorted_and_distinct() {
    let repos = setup();
    let vannaka = repos.master_repo.insert(&master("Vannaka", false)).unwrap();
    let nieve = repos.master_repo.insert(&master("Nieve", false)).unwrap();
    let dragons = repos.task_repo.add_task("Blue dragons", 1).unwrap();
    let lizards = repos.task_repo.add_task("Lizards", 22).unwrap();

    let mut dragon_rule = rule(vannaka, dragons, None);
    dragon_rule.quest_unlocks = vec!["Dragon Slayer I".to_string()];
    repos.task_repo.add_assignment(&dragon_rule).unwrap();

    let mut nieve_dragons = rule(nieve, dragons, None);
    nieve_dragons.quest_unlocks = vec!["Dragon Slayer I".to_string(), "Animal Magnetism".to_string()];
    nieve_dragons.slayer_unlock = Some("Seeing red".to_string());
    repos.task_repo.add_assignment(&nieve_dragons).unwrap();

    let mut lizard_rule = rule(nieve, lizards, None);
    lizard_rule.slayer_unlock = Some("Reptile got ripped".to_string());
    repos.task_repo.add_assignment(&lizard_rule).unwrap();

    let catalog = repos.task_repo.list_unlocks().unwrap();
    assert_eq!(catalog.quests, vec!["Animal Magnetism", "Dragon Slayer I"]);
    assert_eq!(catalog.slayer_unlocks, vec!["Reptile got ripped", "Seeing red"]);
}

// ==========================================
// 屏蔽
// ==========================================

#[test]
fn test_block_unblock_roundtrip() {
    let repos = setup();
    let turael = repos.master_repo.insert(&master("Turael", false)).unwrap();
    let bears = repos.task_repo.add_task("Bears", 1).unwrap();

    assert!(!repos.blocked_repo.is_blocked(turael, bears).unwrap());
    assert!(repos.blocked_repo.block(turael, bears).unwrap());
    assert!(!repos.blocked_repo.block(turael, bears).unwrap());
    assert!(repos.blocked_repo.is_blocked(turael, bears).unwrap());

    let blocked = repos.blocked_repo.list_by_master(turael).unwrap();
    assert_eq!(blocked.len(), 1);
    assert!(blocked[0].blocked_at.is_some());

    repos.blocked_repo.unblock(turael, bears).unwrap();
    repos.blocked_repo.unblock(turael, bears).unwrap();
    assert!(repos.blocked_repo.find_blocked_task_ids(turael).unwrap().is_empty());
}

// ==========================================
// 玩家档案
// ==========================================

#[test]
fn test_player_profile_roundtrip() {
    let repos = setup();

    let empty = repos.player_repo.get_profile(ProfileDefaults::default()).unwrap();
    assert_eq!(empty, PlayerProfile::default());

    let mut profile = PlayerProfile::default();
    profile.combat_level = 95;
    profile.slayer_level = 72;
    profile.completed_quests.insert("Dragon Slayer I".to_string());
    profile.slayer_unlocks.insert("Seeing red".to_string());
    repos.player_repo.save_profile(&profile).unwrap();

    let loaded = repos.player_repo.get_profile(ProfileDefaults::default()).unwrap();
    assert_eq!(loaded, profile);
}

#[test]
fn test_malformed_player_values_fall_back() {
    let repos = setup();
    repos.player_repo.set_value("combat_level", "abc").unwrap();
    repos.player_repo.set_value("completed_quests", "not json").unwrap();

    let profile = repos
        .player_repo
        .get_profile(ProfileDefaults {
            combat_level: 50,
            slayer_level: 10,
        })
        .unwrap();
    assert_eq!(profile.combat_level, 50);
    assert_eq!(profile.slayer_level, 10);
    assert!(profile.completed_quests.is_empty());
}

#[test]
fn test_malformed_quest_unlocks_read_as_empty() {
    let (temp_file, db_path) = create_test_db().unwrap();
    let conn = open_sqlite_connection(&db_path).unwrap();
    init_schema(&conn).unwrap();
    let conn = Arc::new(Mutex::new(conn));
    let master_repo = SlayerMasterRepository::from_connection(conn.clone());
    let task_repo = TaskRepository::from_connection(conn.clone());

    let vannaka = master_repo.insert(&master("Vannaka", false)).unwrap();
    let dragons = task_repo.add_task("Blue dragons", 1).unwrap();
    let mut dragon_rule = rule(vannaka, dragons, None);
    dragon_rule.quest_unlocks = vec!["Dragon Slayer I".to_string()];
    task_repo.add_assignment(&dragon_rule).unwrap();

    conn.lock()
        .unwrap()
        .execute("UPDATE master_tasks SET quest_unlocks = 'not json'", [])
        .unwrap();

    let rules = task_repo.find_rules_by_master(vannaka).unwrap();
    assert_eq!(rules.len(), 1);
    assert!(rules[0].quest_unlocks.is_empty());
    assert!(task_repo.list_unlocks().unwrap().quests.is_empty());

    drop(temp_file);
}

// ==========================================
// 救灾物资调度系统 - 物资分配引擎
// ==========================================
// 职责: (areas, trucks) → (assignments) 的纯函数式分配
// 策略: 紧急度降序 + 首次适配（first-fit），刻意不做全局最优
// ==========================================
// 输入: 区域快照 + 车辆快照（两者均非空）
// 输出: 每个输入区域恰好一条 AllocationOutcome，按处理顺序排列
// 红线: 不修改调用方持有的快照; 同输入必须同输出（无随机、无时钟、无并发）
// ==========================================

use crate::domain::{AllocationOutcome, Area, AreaResult, Truck};
use crate::engine::diagnosis::DiagnosisClassifier;
use crate::engine::{EngineError, EngineResult};
use tracing::{debug, instrument};

// ==========================================
// AllocationEngine - 物资分配引擎
// ==========================================
pub struct AllocationEngine {
    classifier: DiagnosisClassifier,
}

impl AllocationEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {
            classifier: DiagnosisClassifier::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行一次完整的分配运行
    ///
    /// 处理规则:
    /// 1) 区域按 urgency_level 降序处理，相同等级保持输入相对顺序（稳定排序）
    /// 2) 每个区域在车辆列表中按给定顺序做首次适配:
    ///    行车时间存在且 ≤ 时限，并且全部所需物资数量充足
    /// 3) 命中后立即按需求扣减该车工作副本的库存，
    ///    该车以剩余库存继续参与后续区域的匹配
    /// 4) 无车可用时基于"当前已扣减的车队"判定诊断原因
    ///
    /// # 参数
    /// - `areas`: 区域快照（非空）
    /// - `trucks`: 车辆快照（非空，顺序影响首次适配结果）
    ///
    /// # 返回
    /// - Ok(Vec<AllocationOutcome>): 每个输入区域恰好一条
    /// - Err(EngineError::IncompleteData): 任一快照为空
    #[instrument(skip(self, areas, trucks), fields(areas = areas.len(), trucks = trucks.len()))]
    pub fn allocate(&self, areas: &[Area], trucks: &[Truck]) -> EngineResult<Vec<AllocationOutcome>> {
        if areas.is_empty() || trucks.is_empty() {
            return Err(EngineError::IncompleteData);
        }

        // 工作副本: 本次运行内的扣减不触及调用方快照
        let mut fleet: Vec<Truck> = trucks.iter().map(Truck::working_copy).collect();

        // 紧急度降序，稳定排序保证同级区域维持输入相对顺序
        let mut ordered: Vec<&Area> = areas.iter().collect();
        ordered.sort_by(|a, b| b.urgency_level.cmp(&a.urgency_level));

        let mut outcomes = Vec::with_capacity(ordered.len());

        for area in ordered {
            match self.find_suitable_truck(area, &fleet) {
                Some(index) => {
                    let truck = &mut fleet[index];
                    truck.deduct(&area.required_resources);

                    debug!(
                        area_id = %area.area_id,
                        truck_id = %truck.truck_id,
                        "区域匹配成功"
                    );

                    outcomes.push(AllocationOutcome {
                        area_id: area.area_id.clone(),
                        result: AreaResult::Matched {
                            truck_id: truck.truck_id.clone(),
                            // 交付清单是区域需求的副本，不是车上剩余量
                            resources_delivered: area.required_resources.clone(),
                        },
                    });
                }
                None => {
                    let reason = self.classifier.classify(area, &fleet);

                    debug!(
                        area_id = %area.area_id,
                        reason = ?reason,
                        "区域匹配失败"
                    );

                    outcomes.push(AllocationOutcome {
                        area_id: area.area_id.clone(),
                        result: AreaResult::Unmatched { reason },
                    });
                }
            }
        }

        Ok(outcomes)
    }

    // ==========================================
    // 匹配方法
    // ==========================================

    /// 首次适配: 返回第一辆同时满足时限与物资约束的车辆下标
    ///
    /// 刻意不在多辆可行车辆之间比较"更优"，两辆都可行时永远选先出现的。
    fn find_suitable_truck(&self, area: &Area, fleet: &[Truck]) -> Option<usize> {
        fleet.iter().position(|truck| {
            truck.can_reach_in_time(&area.area_id, area.time_constraint_hours)
                && truck.can_supply(&area.required_resources)
        })
    }
}

impl Default for AllocationEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ResourceMap, TravelTimeMap, UnassignedReason};

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn resources(pairs: &[(&str, i64)]) -> ResourceMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn travel(pairs: &[(&str, i64)]) -> TravelTimeMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn area(id: &str, urgency: i32, required: ResourceMap, limit: i64) -> Area {
        Area::new(id, urgency, required, limit)
    }

    fn truck(id: &str, available: ResourceMap, routes: TravelTimeMap) -> Truck {
        Truck::new(id, available, routes)
    }

    fn matched_truck(outcome: &AllocationOutcome) -> Option<&str> {
        match &outcome.result {
            AreaResult::Matched { truck_id, .. } => Some(truck_id.as_str()),
            AreaResult::Unmatched { .. } => None,
        }
    }

    fn unmatched_reason(outcome: &AllocationOutcome) -> Option<UnassignedReason> {
        match &outcome.result {
            AreaResult::Unmatched { reason } => Some(*reason),
            AreaResult::Matched { .. } => None,
        }
    }

    // ==========================================
    // 正常案例测试
    // ==========================================

    #[test]
    fn test_scenario_01_single_match() {
        // 场景1: 单区域单车辆，时限与物资都满足
        let engine = AllocationEngine::new();

        let areas = vec![area("A1", 5, resources(&[("Water", 10)]), 6)];
        let trucks = vec![truck("T1", resources(&[("Water", 10)]), travel(&[("A1", 4)]))];

        let outcomes = engine.allocate(&areas, &trucks).unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].area_id, "A1");
        assert_eq!(matched_truck(&outcomes[0]), Some("T1"));
        match &outcomes[0].result {
            AreaResult::Matched {
                resources_delivered,
                ..
            } => assert_eq!(resources_delivered["Water"], 10),
            _ => panic!("Expected Matched"),
        }
    }

    #[test]
    fn test_scenario_02_insufficient_quantity() {
        // 场景2: 物资种类存在但数量不够 → ResourceIssue
        let engine = AllocationEngine::new();

        let areas = vec![area("A1", 5, resources(&[("Water", 10)]), 6)];
        let trucks = vec![truck("T1", resources(&[("Water", 5)]), travel(&[("A1", 4)]))];

        let outcomes = engine.allocate(&areas, &trucks).unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(
            unmatched_reason(&outcomes[0]),
            Some(UnassignedReason::ResourceIssue)
        );
    }

    #[test]
    fn test_scenario_03_no_travel_info_priority() {
        // 场景3: 无任何行车时间记录，即使物资同时短缺，
        // NoTravelInfo 仍然优先
        let engine = AllocationEngine::new();

        let areas = vec![area("A1", 5, resources(&[("Water", 100)]), 6)];
        let trucks = vec![truck("T1", resources(&[("Water", 5)]), travel(&[("A9", 4)]))];

        let outcomes = engine.allocate(&areas, &trucks).unwrap();

        assert_eq!(
            unmatched_reason(&outcomes[0]),
            Some(UnassignedReason::NoTravelInfo)
        );
    }

    #[test]
    fn test_scenario_04_urgency_first_scarcity_propagates() {
        // 场景4: 两区域争夺同一车辆，高紧急度先服务，
        // 低紧急度得到"扣减后"的诊断
        let engine = AllocationEngine::new();

        let areas = vec![
            area("A-low", 3, resources(&[("Water", 10)]), 6),
            area("A-high", 5, resources(&[("Water", 10)]), 6),
        ];
        let trucks = vec![truck(
            "T1",
            resources(&[("Water", 10)]),
            travel(&[("A-low", 4), ("A-high", 4)]),
        )];

        let outcomes = engine.allocate(&areas, &trucks).unwrap();

        // 输出按处理顺序: 紧急度 5 在前
        assert_eq!(outcomes[0].area_id, "A-high");
        assert_eq!(matched_truck(&outcomes[0]), Some("T1"));

        assert_eq!(outcomes[1].area_id, "A-low");
        assert_eq!(
            unmatched_reason(&outcomes[1]),
            Some(UnassignedReason::ResourceIssue)
        );
    }

    #[test]
    fn test_scenario_05_first_fit_not_best_fit() {
        // 场景5: 两辆车都可行时，永远选先出现的（首次适配，不比较优劣）
        let engine = AllocationEngine::new();

        let areas = vec![area("A1", 5, resources(&[("Water", 10)]), 6)];
        let trucks = vec![
            // T1 行车更慢、库存更富余，但它排在前面
            truck("T1", resources(&[("Water", 100)]), travel(&[("A1", 6)])),
            truck("T2", resources(&[("Water", 10)]), travel(&[("A1", 1)])),
        ];

        let outcomes = engine.allocate(&areas, &trucks).unwrap();
        assert_eq!(matched_truck(&outcomes[0]), Some("T1"));
    }

    #[test]
    fn test_scenario_06_truck_remains_eligible_with_reduced_inventory() {
        // 场景6: 同一辆车可服务多个区域，库存逐次扣减
        let engine = AllocationEngine::new();

        let areas = vec![
            area("A1", 5, resources(&[("Water", 6)]), 6),
            area("A2", 4, resources(&[("Water", 4)]), 6),
            area("A3", 3, resources(&[("Water", 1)]), 6),
        ];
        let trucks = vec![truck(
            "T1",
            resources(&[("Water", 10)]),
            travel(&[("A1", 2), ("A2", 2), ("A3", 2)]),
        )];

        let outcomes = engine.allocate(&areas, &trucks).unwrap();

        // 6 + 4 = 10, 前两个区域吃光库存
        assert_eq!(matched_truck(&outcomes[0]), Some("T1"));
        assert_eq!(matched_truck(&outcomes[1]), Some("T1"));
        assert_eq!(
            unmatched_reason(&outcomes[2]),
            Some(UnassignedReason::ResourceIssue)
        );
    }

    // ==========================================
    // 边界案例测试
    // ==========================================

    #[test]
    fn test_scenario_07_empty_areas_fails() {
        // 场景7: 区域快照为空 → IncompleteData，无任何输出
        let engine = AllocationEngine::new();
        let trucks = vec![truck("T1", resources(&[("Water", 10)]), travel(&[("A1", 4)]))];

        let result = engine.allocate(&[], &trucks);
        assert!(matches!(result, Err(EngineError::IncompleteData)));
    }

    #[test]
    fn test_scenario_08_empty_trucks_fails() {
        // 场景8: 车辆快照为空 → IncompleteData
        let engine = AllocationEngine::new();
        let areas = vec![area("A1", 5, resources(&[("Water", 10)]), 6)];

        let result = engine.allocate(&areas, &[]);
        assert!(matches!(result, Err(EngineError::IncompleteData)));
    }

    #[test]
    fn test_scenario_09_exact_fit_to_zero() {
        // 场景9: 需求恰好等于库存，扣减到零仍算匹配成功
        let engine = AllocationEngine::new();

        let areas = vec![
            area("A1", 5, resources(&[("Water", 10)]), 6),
            area("A2", 4, resources(&[("Water", 1)]), 6),
        ];
        let trucks = vec![truck(
            "T1",
            resources(&[("Water", 10)]),
            travel(&[("A1", 4), ("A2", 4)]),
        )];

        let outcomes = engine.allocate(&areas, &trucks).unwrap();
        assert_eq!(matched_truck(&outcomes[0]), Some("T1"));
        // 水已为 0，第二个区域拿不到
        assert_eq!(
            unmatched_reason(&outcomes[1]),
            Some(UnassignedReason::ResourceIssue)
        );
    }

    #[test]
    fn test_scenario_10_travel_time_exactly_at_limit() {
        // 场景10: 行车时间恰好等于时限 → 满足（≤ 语义）
        let engine = AllocationEngine::new();

        let areas = vec![area("A1", 5, resources(&[("Water", 1)]), 4)];
        let trucks = vec![truck("T1", resources(&[("Water", 1)]), travel(&[("A1", 4)]))];

        let outcomes = engine.allocate(&areas, &trucks).unwrap();
        assert_eq!(matched_truck(&outcomes[0]), Some("T1"));
    }

    #[test]
    fn test_scenario_11_caller_snapshot_not_mutated() {
        // 场景11: 引擎绝不修改调用方快照
        let engine = AllocationEngine::new();

        let areas = vec![area("A1", 5, resources(&[("Water", 10)]), 6)];
        let trucks = vec![truck("T1", resources(&[("Water", 10)]), travel(&[("A1", 4)]))];

        let _ = engine.allocate(&areas, &trucks).unwrap();

        // 原始快照中的库存不变
        assert_eq!(trucks[0].available_resources["Water"], 10);
    }

    #[test]
    fn test_scenario_12_output_covers_every_area_exactly_once() {
        // 场景12: 输出条数 = 输入区域数，且每个 area_id 恰好出现一次
        let engine = AllocationEngine::new();

        let areas = vec![
            area("A1", 2, resources(&[("Water", 1)]), 6),
            area("A2", 4, resources(&[("Food", 1)]), 6),
            area("A3", 1, resources(&[("Medicine", 1)]), 6),
        ];
        let trucks = vec![truck(
            "T1",
            resources(&[("Water", 1), ("Food", 1)]),
            travel(&[("A1", 2), ("A2", 2)]),
        )];

        let outcomes = engine.allocate(&areas, &trucks).unwrap();

        assert_eq!(outcomes.len(), areas.len());
        let mut ids: Vec<&str> = outcomes.iter().map(|o| o.area_id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["A1", "A2", "A3"]);
    }

    // ==========================================
    // 顺序与确定性测试
    // ==========================================

    #[test]
    fn test_scenario_13_stable_tie_break_keeps_input_order() {
        // 场景13: 相同紧急等级的区域维持输入相对顺序（稳定排序契约）
        let engine = AllocationEngine::new();

        let areas = vec![
            area("A-first", 3, resources(&[("Water", 1)]), 6),
            area("A-second", 3, resources(&[("Water", 1)]), 6),
            area("A-top", 5, resources(&[("Water", 1)]), 6),
        ];
        let trucks = vec![truck(
            "T1",
            resources(&[("Water", 100)]),
            travel(&[("A-first", 1), ("A-second", 1), ("A-top", 1)]),
        )];

        let outcomes = engine.allocate(&areas, &trucks).unwrap();

        assert_eq!(outcomes[0].area_id, "A-top");
        assert_eq!(outcomes[1].area_id, "A-first");
        assert_eq!(outcomes[2].area_id, "A-second");
    }

    #[test]
    fn test_scenario_14_permuting_equal_urgency_changes_only_tiebreak() {
        // 场景14: 交换同级区域的输入顺序只改变同级间处理顺序，
        // 不改变它们各自拿到的车辆（车辆顺序固定且运力充足时）
        let engine = AllocationEngine::new();

        let trucks = vec![
            truck("T1", resources(&[("Water", 100)]), travel(&[("A1", 1), ("A2", 1)])),
            truck("T2", resources(&[("Water", 100)]), travel(&[("A1", 1), ("A2", 1)])),
        ];

        let forward = vec![
            area("A1", 3, resources(&[("Water", 1)]), 6),
            area("A2", 3, resources(&[("Water", 1)]), 6),
        ];
        let reversed = vec![
            area("A2", 3, resources(&[("Water", 1)]), 6),
            area("A1", 3, resources(&[("Water", 1)]), 6),
        ];

        let out_forward = engine.allocate(&forward, &trucks).unwrap();
        let out_reversed = engine.allocate(&reversed, &trucks).unwrap();

        // 处理顺序互换
        assert_eq!(out_forward[0].area_id, "A1");
        assert_eq!(out_reversed[0].area_id, "A2");

        // 但每个区域得到的车辆不变（都是首次适配到 T1）
        for outcomes in [&out_forward, &out_reversed] {
            for o in outcomes.iter() {
                assert_eq!(matched_truck(o), Some("T1"));
            }
        }
    }

    #[test]
    fn test_scenario_15_idempotent_on_independent_copies() {
        // 场景15: 对两份独立未变更的输入重复运行，输出完全一致
        let engine = AllocationEngine::new();

        let areas = vec![
            area("A1", 5, resources(&[("Water", 6), ("Food", 2)]), 6),
            area("A2", 5, resources(&[("Water", 6)]), 4),
            area("A3", 2, resources(&[("Blanket", 3)]), 8),
        ];
        let trucks = vec![
            truck(
                "T1",
                resources(&[("Water", 10), ("Food", 2)]),
                travel(&[("A1", 2), ("A2", 3)]),
            ),
            truck("T2", resources(&[("Water", 6)]), travel(&[("A2", 4)])),
        ];

        let first = engine.allocate(&areas, &trucks).unwrap();
        let second = engine.allocate(&areas, &trucks).unwrap();

        assert_eq!(first, second);

        // 序列化后也逐字节一致（BTreeMap 保证键序稳定）
        let json_first = serde_json::to_string(&first).unwrap();
        let json_second = serde_json::to_string(&second).unwrap();
        assert_eq!(json_first, json_second);
    }

    #[test]
    fn test_scenario_16_diagnosis_uses_decremented_fleet() {
        // 场景16: 诊断基于"已扣减"的车队——原本种类存在，
        // 被高紧急度区域吃光后，后续区域看到的是数量不足而非种类缺失
        // （扣减只清零数量，键仍在，所以是 ResourceIssue）
        let engine = AllocationEngine::new();

        let areas = vec![
            area("A1", 5, resources(&[("Water", 10)]), 6),
            area("A2", 1, resources(&[("Water", 5)]), 6),
        ];
        let trucks = vec![truck(
            "T1",
            resources(&[("Water", 10)]),
            travel(&[("A1", 2), ("A2", 2)]),
        )];

        let outcomes = engine.allocate(&areas, &trucks).unwrap();

        assert_eq!(matched_truck(&outcomes[0]), Some("T1"));
        assert_eq!(
            unmatched_reason(&outcomes[1]),
            Some(UnassignedReason::ResourceIssue)
        );
    }

    #[test]
    fn test_scenario_17_larger_mixed_run() {
        // 场景17: 多区域多车辆混合场景
        let engine = AllocationEngine::new();

        let areas = vec![
            area("A1", 1, resources(&[("Water", 5)]), 10),
            area("A2", 4, resources(&[("Food", 8)]), 5),
            area("A3", 4, resources(&[("Water", 5), ("Food", 5)]), 8),
            area("A4", 2, resources(&[("Tent", 2)]), 12),
        ];
        let trucks = vec![
            truck(
                "T1",
                resources(&[("Water", 10), ("Food", 10)]),
                travel(&[("A1", 3), ("A3", 6)]),
            ),
            truck("T2", resources(&[("Food", 8)]), travel(&[("A2", 5), ("A4", 6)])),
        ];

        let outcomes = engine.allocate(&areas, &trucks).unwrap();
        assert_eq!(outcomes.len(), 4);

        // 处理顺序: A2(4) → A3(4) → A4(2) → A1(1)
        assert_eq!(outcomes[0].area_id, "A2");
        assert_eq!(matched_truck(&outcomes[0]), Some("T2"));

        assert_eq!(outcomes[1].area_id, "A3");
        assert_eq!(matched_truck(&outcomes[1]), Some("T1"));

        // A4: 没有车装载 Tent → MissingResourceType
        assert_eq!(outcomes[2].area_id, "A4");
        assert_eq!(
            unmatched_reason(&outcomes[2]),
            Some(UnassignedReason::MissingResourceType)
        );

        // A1: T1 剩 Water 5，够
        assert_eq!(outcomes[3].area_id, "A1");
        assert_eq!(matched_truck(&outcomes[3]), Some("T1"));
    }
}

//! Behavioural properties of the dependency graph under file events.

use trellis_config::ScopeLayout;
use trellis_param::{
    HdlParam, InstanceId, MemoryParser, ModuleId, ParsedFile, RawModule, ResolutionStatus,
};

fn vlog(modules: Vec<RawModule>) -> ParsedFile {
    modules
        .into_iter()
        .fold(ParsedFile::new("vlog"), |file, m| file.with_module(m))
}

fn registry() -> HdlParam {
    HdlParam::new(ScopeLayout::single_scope("/prj"))
}

fn instance_of(param: &HdlParam, path: &str, module: &str, inst: &str) -> (ResolutionStatus, Option<String>) {
    let m = param.get_hdl_module(path, module).expect("module exists");
    let inst = param
        .instance(m.instance_id(inst).expect("instance exists"))
        .expect("instance alive");
    (inst.status(), inst.target_path().map(str::to_string))
}

fn top_names(param: &HdlParam, global: bool) -> Vec<String> {
    param
        .get_all_top_modules(global)
        .iter()
        .map(|m| format!("{}:{}", m.path(), param.name_of(m.name())))
        .collect()
}

#[test]
fn end_to_end_add_then_delete_definition() {
    let parser = MemoryParser::new()
        .with("/prj/a.v", vlog(vec![RawModule::new("top").with_instance("u_leaf", "leaf")]))
        .with("/prj/b.v", vlog(vec![RawModule::new("leaf")]));
    let mut param = registry();

    param.add_hdl_file("/prj/a.v", &parser).unwrap();
    assert_eq!(param.get_unhandle_instance_number(), 1);
    assert!(param.is_top_module("/prj/a.v", "top", true));
    let before_tops = top_names(&param, true);
    let before_stats = param.stats();
    param.check_invariants().unwrap();

    param.add_hdl_file("/prj/b.v", &parser).unwrap();
    assert_eq!(param.get_unhandle_instance_number(), 0);
    assert_eq!(
        instance_of(&param, "/prj/a.v", "top", "u_leaf"),
        (ResolutionStatus::Others, Some("/prj/b.v".to_string()))
    );
    assert!(!param.is_top_module("/prj/b.v", "leaf", true));
    assert!(param.is_top_module("/prj/a.v", "top", true));
    param.check_invariants().unwrap();

    param.delete_hdl_file("/prj/b.v").unwrap();
    assert_eq!(param.get_unhandle_instance_number(), 1);
    assert_eq!(instance_of(&param, "/prj/a.v", "top", "u_leaf"), (ResolutionStatus::Unknown, None));
    assert_eq!(
        param.get_unhandle_instance_by_type("leaf").map(|i| i.name()),
        Some("u_leaf")
    );
    assert_eq!(top_names(&param, true), before_tops);
    assert_eq!(param.stats(), before_stats);
    param.check_invariants().unwrap();
}

#[test]
fn resolution_falls_through_tiers_on_removal() {
    let parser = MemoryParser::new()
        .with(
            "/prj/src/top.v",
            ParsedFile::new("vlog")
                .with_include("../inc/leaf.vh")
                .with_module(RawModule::new("top").with_instance("u0", "leaf"))
                .with_module(RawModule::new("leaf")),
        )
        .with("/prj/inc/leaf.vh", vlog(vec![RawModule::new("leaf")]))
        .with("/prj/other/leaf.v", vlog(vec![RawModule::new("leaf")]));
    let mut param = registry();
    param.initialize(["/prj/other/leaf.v", "/prj/src/top.v", "/prj/inc/leaf.vh"], &parser);
    assert_eq!(instance_of(&param, "/prj/src/top.v", "top", "u0").0, ResolutionStatus::Current);

    parser.insert(
        "/prj/src/top.v",
        ParsedFile::new("vlog")
            .with_include("../inc/leaf.vh")
            .with_module(RawModule::new("top").with_instance("u0", "leaf")),
    );
    param.update_hdl_file("/prj/src/top.v", &parser).unwrap();
    assert_eq!(
        instance_of(&param, "/prj/src/top.v", "top", "u0"),
        (ResolutionStatus::Include, Some("/prj/inc/leaf.vh".to_string()))
    );
    param.check_invariants().unwrap();

    param.delete_hdl_file("/prj/inc/leaf.vh").unwrap();
    assert_eq!(
        instance_of(&param, "/prj/src/top.v", "top", "u0"),
        (ResolutionStatus::Others, Some("/prj/other/leaf.v".to_string()))
    );
    assert_eq!(param.get_unhandle_instance_number(), 0);
    param.check_invariants().unwrap();

    param.delete_hdl_file("/prj/other/leaf.v").unwrap();
    assert_eq!(instance_of(&param, "/prj/src/top.v", "top", "u0").0, ResolutionStatus::Unknown);
    assert_eq!(param.get_unhandle_instance_number(), 1);
    param.check_invariants().unwrap();
}

#[test]
fn new_definition_upgrades_weaker_bindings() {
    let parser = MemoryParser::new()
        .with(
            "/prj/top.v",
            ParsedFile::new("vlog")
                .with_include("cells.vh")
                .with_module(RawModule::new("top").with_instance("u0", "cell")),
        )
        .with("/prj/far/cell.v", vlog(vec![RawModule::new("cell")]))
        .with("/prj/cells.vh", vlog(vec![RawModule::new("cell")]));
    let mut param = registry();
    param.initialize(["/prj/top.v", "/prj/far/cell.v"], &parser);
    assert_eq!(instance_of(&param, "/prj/top.v", "top", "u0").0, ResolutionStatus::Others);

    param.add_hdl_file("/prj/cells.vh", &parser).unwrap();
    assert_eq!(
        instance_of(&param, "/prj/top.v", "top", "u0"),
        (ResolutionStatus::Include, Some("/prj/cells.vh".to_string()))
    );
    assert!(param.is_top_module("/prj/far/cell.v", "cell", true));
    assert!(!param.is_top_module("/prj/cells.vh", "cell", true));
    param.check_invariants().unwrap();
}

#[test]
fn pool_round_trip_for_every_pending_instance() {
    let parser = MemoryParser::new()
        .with("/prj/a.v", vlog(vec![RawModule::new("a").with_instance("u0", "fifo").with_instance("u1", "fifo")]))
        .with("/prj/b.v", vlog(vec![RawModule::new("b").with_instance("u0", "fifo")]))
        .with("/prj/fifo.v", vlog(vec![RawModule::new("fifo")]));
    let mut param = registry();
    param.initialize(["/prj/a.v", "/prj/b.v"], &parser);
    assert_eq!(param.get_unhandle_instance_number(), 3);
    assert_eq!(param.get_unhandle_instances_by_type("fifo").len(), 3);
    assert_eq!(
        param.get_unhandle_instance_by_type("fifo").map(|i| i.name()),
        Some("u0")
    );

    param.add_hdl_file("/prj/fifo.v", &parser).unwrap();
    assert_eq!(param.get_unhandle_instance_number(), 0);
    assert_eq!(
        param.get_hdl_module("/prj/fifo.v", "fifo").unwrap().global_referrers().len(),
        3
    );
    param.check_invariants().unwrap();

    param.delete_hdl_file("/prj/fifo.v").unwrap();
    assert_eq!(param.get_unhandle_instance_number(), 3);
    param.check_invariants().unwrap();
}

#[test]
fn unchanged_reparse_keeps_identities() {
    let parsed = vlog(vec![
        RawModule::new("top")
            .with_instance("u_a", "a")
            .with_instance("u_x", "missing"),
        RawModule::new("a").with_instance("u_b", "b"),
    ]);
    let parser = MemoryParser::new()
        .with("/prj/top.v", parsed.clone())
        .with("/prj/b.v", vlog(vec![RawModule::new("b")]));
    let mut param = registry();
    param.initialize(["/prj/top.v", "/prj/b.v"], &parser);

    let snapshot = |param: &HdlParam| -> Vec<(ModuleId, Vec<InstanceId>, Vec<InstanceId>, Vec<InstanceId>)> {
        param
            .get_all_hdl_modules()
            .iter()
            .map(|m| {
                let id = param.module_id(m.path(), param.name_of(m.name())).unwrap();
                (
                    id,
                    m.instance_ids().collect(),
                    m.global_referrers().iter().copied().collect(),
                    m.local_referrers().iter().copied().collect(),
                )
            })
            .collect()
    };
    let before = snapshot(&param);
    let tops_before = top_names(&param, true);
    let pool_before = param.get_unhandle_instance_number();

    param.apply_file_change("/prj/top.v", parsed).unwrap();
    assert_eq!(snapshot(&param), before);
    assert_eq!(top_names(&param, true), tops_before);
    assert_eq!(param.get_unhandle_instance_number(), pool_before);
    param.check_invariants().unwrap();
}

#[test]
fn dependences_terminate_on_cycles() {
    let parser = MemoryParser::new()
        .with("/prj/a.v", vlog(vec![RawModule::new("a").with_instance("u_b", "b").with_instance("u_self", "a")]))
        .with("/prj/b.v", vlog(vec![RawModule::new("b").with_instance("u_c", "c")]))
        .with("/prj/c.v", vlog(vec![RawModule::new("c").with_instance("u_a", "a")]));
    let mut param = registry();
    param.initialize(["/prj/a.v", "/prj/b.v", "/prj/c.v"], &parser);
    let deps = param.get_all_dependences("/prj/b.v", "b").unwrap();
    assert_eq!(deps.others, vec!["/prj/c.v", "/prj/a.v", "/prj/b.v"]);
    let self_deps = param.get_all_dependences("/prj/a.v", "a").unwrap();
    assert_eq!(self_deps.current, vec!["/prj/a.v"]);
    assert!(param.get_all_top_modules(true).is_empty());
    param.check_invariants().unwrap();

    param.delete_hdl_file("/prj/a.v").unwrap();
    assert!(param.is_top_module("/prj/b.v", "b", true));
    assert_eq!(param.get_unhandle_instance_number(), 1);
    param.check_invariants().unwrap();
}

#[test]
fn scoped_tops_follow_edits() {
    let parser = MemoryParser::new()
        .with("/prj/src/core.v", vlog(vec![RawModule::new("core")]))
        .with("/prj/sim/tb.v", vlog(vec![RawModule::new("tb").with_instance("dut", "core")]))
        .with("/prj/src/soc.v", vlog(vec![RawModule::new("soc").with_instance("u_core", "core")]));
    let mut param = HdlParam::new(ScopeLayout::new("/prj", "src", "sim"));
    param.initialize(["/prj/src/core.v", "/prj/sim/tb.v"], &parser);
    assert!(param.is_top_module("/prj/src/core.v", "core", false));
    assert!(!param.is_top_module("/prj/src/core.v", "core", true));

    param.add_hdl_file("/prj/src/soc.v", &parser).unwrap();
    assert!(!param.is_top_module("/prj/src/core.v", "core", false));
    let core = param.get_hdl_module("/prj/src/core.v", "core").unwrap();
    assert_eq!(core.global_referrers().len(), 2);
    assert_eq!(core.local_referrers().len(), 1);
    param.check_invariants().unwrap();

    param.delete_hdl_file("/prj/src/soc.v").unwrap();
    assert!(param.is_top_module("/prj/src/core.v", "core", false));
    param.check_invariants().unwrap();
}

#[test]
fn long_edit_session_stays_consistent() {
    let parser = MemoryParser::new();
    let mut param = registry();
    let names = ["alu", "fifo", "uart", "core", "soc"];
    for (step, name) in names.iter().enumerate() {
        let mut module = RawModule::new(name);
        for dep in names.iter().skip(step + 1) {
            module = module.with_instance(&format!("u_{dep}"), dep);
        }
        let path = format!("/prj/{name}.v");
        parser.insert(&path, vlog(vec![module]));
        param.add_hdl_file(&path, &parser).unwrap();
        param.check_invariants().unwrap();
    }
    assert_eq!(top_names(&param, true), vec!["/prj/alu.v:alu"]);

    parser.insert("/prj/core.v", vlog(vec![RawModule::new("core"), RawModule::new("soc")]));
    param.update_hdl_file("/prj/core.v", &parser).unwrap();
    param.check_invariants().unwrap();

    for name in ["fifo", "soc", "core"] {
        param.delete_hdl_file(&format!("/prj/{name}.v")).unwrap();
        param.check_invariants().unwrap();
    }
    assert_eq!(param.file_count(), 2);
    assert_eq!(param.get_unhandle_instance_number(), 5);
}

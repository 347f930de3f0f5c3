use crate::analysis::{merge_collected_name_lists, MergeGroup};
use crate::block::{BlockKind, GlslBlock};
use crate::token::GlslName;
use crate::{CrunchOptions, Glsl, Mode, StageType};
use regex::Regex;
use std::str::FromStr;

fn crunch_single(source: &str, stage: Option<StageType>, options: &CrunchOptions) -> String {
    let mut glsl = Glsl::new();
    glsl.add_source("test.glsl", stage, source);
    glsl.parse();
    glsl.crunch(options);
    let mut formatted = glsl.format();
    assert_eq!(formatted.len(), 1);
    formatted.pop().unwrap()
}

fn crunch_pair(vertex: &str, fragment: &str, options: &CrunchOptions) -> (String, String) {
    let mut glsl = Glsl::new();
    glsl.add_source("test.vert", Some(StageType::Vertex), vertex);
    glsl.add_source("test.frag", Some(StageType::Fragment), fragment);
    glsl.parse();
    glsl.crunch(options);
    let mut formatted = glsl.format();
    assert_eq!(formatted.len(), 2);
    let fragment = formatted.pop().unwrap();
    let vertex = formatted.pop().unwrap();
    (vertex, fragment)
}

fn none_mode() -> CrunchOptions {
    CrunchOptions {
        mode: Mode::None,
        ..CrunchOptions::default()
    }
}

#[test]
fn mode_parses_from_str() {
    assert_eq!(Mode::from_str("none").unwrap(), Mode::None);
    assert_eq!(Mode::from_str("full").unwrap(), Mode::Full);
    assert!(Mode::from_str("fast").is_err());
}

#[test]
fn none_mode_round_trips_minimal_source() {
    let source = "uniform float t;void main(){gl_FragColor=vec4(t);}";
    assert_eq!(
        crunch_single(source, Some(StageType::Fragment), &none_mode()),
        source
    );
}

#[test]
fn none_mode_strips_whitespace_and_comments() {
    let noisy = "uniform float t; // time\nvoid main() {\n  /* write */\n  gl_FragColor = vec4(t);\n}\n";
    let minimal = "uniform float t;void main(){gl_FragColor=vec4(t);}";
    assert_eq!(
        crunch_single(noisy, Some(StageType::Fragment), &none_mode()),
        minimal
    );
}

#[test]
fn preprocessor_lines_pass_through() {
    let source = "#version 330\nvoid main(){gl_FragColor=vec4(1.);}";
    let output = crunch_single(source, Some(StageType::Fragment), &none_mode());
    assert_eq!(output, "#version 330\nvoid main(){gl_FragColor=vec4(1.);}");
}

#[test]
fn unknown_statements_pass_through() {
    let source = "void main(){atomicCounterIncrement(counter);}";
    let output = crunch_single(source, Some(StageType::Fragment), &none_mode());
    assert_eq!(output, source);
}

#[test]
fn control_chains_round_trip() {
    let source = "void main(){if(x)y=1.;else if(z)y=2.;else y=3.;}";
    assert_eq!(
        crunch_single(source, Some(StageType::Fragment), &none_mode()),
        source
    );
}

#[test]
fn inline_eligible_declaration_vanishes() {
    let source = "void main(){float i_t=2.;gl_FragColor=vec4(i_t);}";
    let output = crunch_single(source, Some(StageType::Fragment), &CrunchOptions::default());
    assert_eq!(output, "void main(){gl_FragColor=vec4(2.);}");
}

#[test]
fn inline_replaces_every_use() {
    let source = "void main(){float i_k=2.;gl_FragColor=vec4(i_k,i_k,i_k,1.);}";
    let output = crunch_single(source, Some(StageType::Fragment), &CrunchOptions::default());
    assert_eq!(output, "void main(){gl_FragColor=vec4(2.,2.,2.,1.);}");
}

#[test]
fn inline_cap_bounds_the_pass() {
    let source = "void main(){float i_t=2.;gl_FragColor=vec4(i_t);}";
    let options = CrunchOptions {
        max_inlines: 0,
        ..CrunchOptions::default()
    };
    let output = crunch_single(source, Some(StageType::Fragment), &options);
    // The declaration survives; both occurrences rename together.
    assert!(!output.contains("i_t"));
    assert!(output.contains("float "));
}

#[test]
fn full_crunch_is_idempotent() {
    let source = "void main(){float i_t=2.;gl_FragColor=vec4(i_t);}";
    let once = crunch_single(source, Some(StageType::Fragment), &CrunchOptions::default());
    let twice = crunch_single(&once, Some(StageType::Fragment), &CrunchOptions::default());
    assert_eq!(once, twice);
}

#[test]
fn uniforms_are_renamed_but_never_inlined() {
    let source = "uniform float i_t;void main(){gl_FragColor=vec4(i_t);}";
    let output = crunch_single(source, Some(StageType::Fragment), &CrunchOptions::default());
    assert!(output.starts_with("uniform float "));
    assert!(!output.contains("i_t"));
    // The renamed uniform is still referenced at its use site.
    let renamed = output
        .strip_prefix("uniform float ")
        .and_then(|tail| tail.split(';').next())
        .unwrap();
    assert!(output.contains(&format!("vec4({})", renamed)));
}

#[test]
fn reserved_words_survive_the_full_pipeline() {
    let source = "void main(){gl_FragColor=vec4(normalize(cross(a,b)),1.);}";
    let output = crunch_single(source, Some(StageType::Fragment), &CrunchOptions::default());
    assert!(output.contains("normalize"));
    assert!(output.contains("cross"));
    assert!(output.contains("gl_FragColor"));
    assert!(output.contains("main"));
}

#[test]
fn cross_stage_varyings_rename_identically() {
    let vertex = "out vec3 v_n;void main(){gl_Position=vec4(v_n,1.);}";
    let fragment = "in vec3 v_n;void main(){gl_FragColor=vec4(v_n,1.);}";
    let (vertex_out, fragment_out) = crunch_pair(vertex, fragment, &CrunchOptions::default());
    let vertex_name = vertex_out
        .strip_prefix("out vec3 ")
        .and_then(|tail| tail.split(';').next())
        .unwrap()
        .to_string();
    let fragment_name = fragment_out
        .strip_prefix("in vec3 ")
        .and_then(|tail| tail.split(';').next())
        .unwrap()
        .to_string();
    assert_eq!(vertex_name, fragment_name);
    assert!(!vertex_out.contains("v_n"));
    assert!(!fragment_out.contains("v_n"));
}

#[test]
fn swizzle_selection_is_globally_consistent() {
    let source = "void main(){vec4 v;v.xyz=vec3(1.);v.xyz=vec3(2.);v.xyz=vec3(3.);v.xyz=vec3(4.);gl_FragColor=vec4(v.rgb,1.);}";
    let output = crunch_single(source, Some(StageType::Fragment), &CrunchOptions::default());
    assert!(!output.contains(".rgb"));
    assert!(output.contains(".xyz"));
}

#[test]
fn exhausted_letters_invent_numbered_names() {
    let mut source = String::new();
    for ii in 0..60 {
        source.push_str(&format!("float g{:02}=1.;", ii));
    }
    source.push_str("void main(){gl_FragColor=vec4(1.);}");
    let output = crunch_single(&source, Some(StageType::Fragment), &CrunchOptions::default());
    let pattern = Regex::new(r"([A-Za-z][A-Za-z0-9]*)=1\.").unwrap();
    let mut names: Vec<String> = pattern
        .captures_iter(&output)
        .map(|capture| capture[1].to_string())
        .collect();
    names.sort();
    names.dedup();
    // Every declaration keeps a distinct spelling.
    assert_eq!(names.len(), 60);
    // Single letters ran out, so at least one name is letter + digits.
    let invented = Regex::new(r"^[A-Za-z][0-9]+$").unwrap();
    assert!(names.iter().any(|name| invented.is_match(name)));
}

#[test]
fn loop_counter_does_not_collide_with_outer_scope() {
    let source = "void main(){float i=2.;for(int i=0;i<4;++i){gl_FragColor=vec4(i);}}";
    let output = crunch_single(source, Some(StageType::Fragment), &CrunchOptions::default());
    let outer = Regex::new(r"float ([A-Za-z][A-Za-z0-9]*)=2\.")
        .unwrap()
        .captures(&output)
        .unwrap()[1]
        .to_string();
    let counter = Regex::new(r"int ([A-Za-z][A-Za-z0-9]*)=0")
        .unwrap()
        .captures(&output)
        .unwrap()[1]
        .to_string();
    assert_ne!(outer, counter);
    // The counter renames consistently through the whole construct.
    assert!(output.contains(&format!("{}<4", counter)));
    assert!(output.contains(&format!("++{}", counter)));
    assert!(output.contains(&format!("vec4({})", counter)));
}

#[test]
fn interface_blocks_merge_across_stages() {
    let vertex = "out VData{vec3 normal;vec3 pos;}vdata;void main(){vdata.normal=vec3(1.);vdata.pos=vec3(2.);gl_Position=vec4(vdata.pos,1.);}";
    let fragment = "in VData{vec3 normal;vec3 pos;}vdata;void main(){gl_FragColor=vec4(vdata.normal,1.);}";
    let (vertex_out, fragment_out) = crunch_pair(vertex, fragment, &CrunchOptions::default());
    assert!(!vertex_out.contains("VData"));
    assert!(!fragment_out.contains("VData"));
    assert!(!vertex_out.contains("vdata"));
    // Member lists and instance names stay identical on both sides.
    let vertex_block = &vertex_out[vertex_out.find('{').unwrap()..vertex_out.find('}').unwrap()];
    let fragment_block =
        &fragment_out[fragment_out.find('{').unwrap()..fragment_out.find('}').unwrap()];
    assert_eq!(vertex_block, fragment_block);
    let instance_of = |output: &str| -> String {
        let close = output.find('}').unwrap();
        let semi = close + output[close..].find(';').unwrap();
        output[close + 1..semi].to_string()
    };
    let vertex_instance = instance_of(&vertex_out);
    assert_eq!(vertex_instance, instance_of(&fragment_out));
    assert!(!vertex_instance.is_empty());
}

#[test]
fn generic_sources_share_their_identifier_pool() {
    let library = "float i_half=.5;";
    let fragment = "void main(){gl_FragColor=vec4(i_half);}";
    let mut glsl = Glsl::new();
    glsl.add_source("lib.glsl", None, library);
    glsl.add_source("test.frag", Some(StageType::Fragment), fragment);
    glsl.parse();
    glsl.crunch(&CrunchOptions::default());
    let formatted = glsl.format();
    // The declaration inlines across the source boundary.
    assert_eq!(formatted[0], "");
    assert_eq!(formatted[1], "void main(){gl_FragColor=vec4(.5);}");
}

#[test]
fn merge_keeps_distinct_objects_with_equal_spelling() {
    let first = GlslName::new("foo");
    let second = GlslName::new("foo");
    let group_a = MergeGroup {
        blocks: vec![GlslBlock::new(BlockKind::Scope)],
        names: vec![first.clone()],
    };
    let group_b = MergeGroup {
        blocks: vec![GlslBlock::new(BlockKind::Scope)],
        names: vec![second.clone()],
    };
    let merged = merge_collected_name_lists(group_a, group_b);
    // Physical identity is the contract: equal spellings stay separate.
    assert_eq!(merged.names.len(), 2);

    let group_c = MergeGroup {
        blocks: vec![GlslBlock::new(BlockKind::Scope)],
        names: vec![first.clone()],
    };
    let merged = merge_collected_name_lists(merged, group_c);
    assert_eq!(merged.names.len(), 2);
}

#[test]
fn count_sorted_orders_by_frequency() {
    let mut glsl = Glsl::new();
    glsl.add_source("test.glsl", None, "aaab;");
    glsl.parse();
    let counted = glsl.count_sorted();
    assert_eq!(counted[0], 'a');
    assert_eq!(counted[1], 'b');
}

use crate::block::{
    extract_scope, extract_tokens, parse_assignment, parse_control, parse_declaration,
    parse_function, parse_inout, parse_struct, parse_uniform, BlockKind, Pat,
};
use crate::token::GlslToken;
use crate::tokenize;

fn parse_one<F>(parser: F, source: &str) -> String
where
    F: for<'a> Fn(&'a [GlslToken]) -> Option<(crate::block::BlockRef, &'a [GlslToken])>,
{
    let tokens = tokenize(source);
    match parser(&tokens) {
        Some((block, rest)) => {
            assert!(rest.is_empty(), "'{}' left tokens unconsumed", source);
            let formatted = block.borrow().format();
            formatted
        }
        None => panic!("'{}' did not parse", source),
    }
}

#[test]
fn scope_extraction_balances_parens() {
    let tokens = tokenize("(()))");
    let opener = match &tokens[0] {
        GlslToken::Paren(paren) => *paren,
        _ => panic!("expected paren"),
    };
    let (scope, tail) = extract_scope(&tokens[1..], &opener).unwrap();
    assert_eq!(scope.len(), 2);
    assert_eq!(scope[0].format(), "(");
    assert_eq!(scope[1].format(), ")");
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].format(), ")");
}

#[test]
fn scope_extraction_misses_on_unbalanced_input() {
    let tokens = tokenize("((");
    let opener = match &tokens[0] {
        GlslToken::Paren(paren) => *paren,
        _ => panic!("expected paren"),
    };
    assert!(extract_scope(&tokens[1..], &opener).is_none());
}

#[test]
fn extract_tokens_is_all_or_nothing() {
    let tokens = tokenize("uniform float t;");
    assert!(extract_tokens(&tokens, &[Pat::Lit("uniform"), Pat::Name]).is_none());
    let (extracted, rest) =
        extract_tokens(&tokens, &[Pat::Lit("uniform"), Pat::Type, Pat::Name]).unwrap();
    assert_eq!(extracted.len(), 2);
    assert_eq!(rest.len(), 1);
}

#[test]
fn extract_tokens_selector_zoo() {
    let tokens = tokenize("if 4u 1.5 += (a)");
    let (extracted, rest) = extract_tokens(
        &tokens,
        &[
            Pat::Control,
            Pat::UInt,
            Pat::Float,
            Pat::Alt(&["*=", "+="]),
            Pat::ScopeParen,
        ],
    )
    .unwrap();
    assert!(rest.is_empty());
    assert_eq!(extracted.len(), 5);
    assert_eq!(extracted[4].scope().unwrap().len(), 1);
}

#[test]
fn uniform_parsing() {
    assert_eq!(parse_one(parse_uniform, "uniform float t;"), "uniform float t;");
    assert_eq!(
        parse_one(parse_uniform, "uniform sampler2D tex;"),
        "uniform sampler2D tex;"
    );
    // Both array orders normalize to the size following the type.
    assert_eq!(
        parse_one(parse_uniform, "uniform vec3 arr[4u];"),
        "uniform vec3[4u]arr;"
    );
    assert_eq!(
        parse_one(parse_uniform, "uniform vec3[4u]arr;"),
        "uniform vec3[4u]arr;"
    );
    assert_eq!(
        parse_one(parse_uniform, "layout(location=1)uniform float t;"),
        "layout(location=1)uniform float t;"
    );
}

#[test]
fn uniform_parsing_misses_are_clean() {
    let tokens = tokenize("in vec3 n;");
    assert!(parse_uniform(&tokens).is_none());
}

#[test]
fn function_parsing() {
    assert_eq!(parse_one(parse_function, "void main(){}"), "void main(){}");
    assert_eq!(
        parse_one(
            parse_function,
            "vec3 rotate(vec3 p,float angle){return p;}"
        ),
        "vec3 rotate(vec3 p,float angle){return p;}"
    );
    assert_eq!(
        parse_one(parse_function, "float sample(out vec2 uv){return uv.x;}"),
        "float sample(out vec2 uv){return uv.x;}"
    );
    // Prototypes have no scope and miss.
    let tokens = tokenize("vec3 rotate(vec3 p);");
    assert!(parse_function(&tokens).is_none());
}

#[test]
fn declaration_parsing() {
    assert_eq!(parse_one(parse_declaration, "float a;"), "float a;");
    assert_eq!(
        parse_one(parse_declaration, "float a=1.,b=2.;"),
        "float a=1.,b=2.;"
    );
    assert_eq!(
        parse_one(parse_declaration, "vec3 v=mix(a,b,t);"),
        "vec3 v=mix(a,b,t);"
    );
}

#[test]
fn assignment_parsing() {
    assert_eq!(parse_one(parse_assignment, "a=b+c;"), "a=b+c;");
    assert_eq!(parse_one(parse_assignment, "a+=2.;"), "a+=2.;");
    assert_eq!(
        parse_one(parse_assignment, "gl_FragColor.xyz=vec3(1.);"),
        "gl_FragColor.xyz=vec3(1.);"
    );
    assert_eq!(parse_one(parse_assignment, "data[2]=0.;"), "data[2]=0.;");
    // Function call statements are not assignments.
    let tokens = tokenize("EmitVertex();");
    assert!(parse_assignment(&tokens).is_none());
}

#[test]
fn control_parsing() {
    assert_eq!(parse_one(parse_control, "return a*b;"), "return a*b;");
    assert_eq!(parse_one(parse_control, "discard;"), "discard;");
    assert_eq!(parse_one(parse_control, "if(a<b)a=b;"), "if(a<b)a=b;");
    assert_eq!(
        parse_one(parse_control, "for(int i=0;i<4;++i){a+=i;}"),
        "for(int i=0;i<4;++i){a+=i;}"
    );
    assert_eq!(
        parse_one(parse_control, "while(a<4.){a*=2.;}"),
        "while(a<4.){a*=2.;}"
    );
}

#[test]
fn control_declares_its_loop_counter() {
    let tokens = tokenize("for(int i=0;i<4;++i){a+=i;}");
    let (block, _) = parse_control(&tokens).unwrap();
    let declared = block.borrow().names_declared();
    assert_eq!(declared.len(), 1);
    assert_eq!(declared[0].name(), "i");
    // The remaining counter occurrences are uses, not declarations.
    let used = block.borrow().names_used();
    assert!(used.iter().any(|n| n.name() == "i"));
    assert!(!used.iter().any(|n| n.ptr_eq(&declared[0])));
}

#[test]
fn struct_parsing() {
    assert_eq!(
        parse_one(parse_struct, "struct Light{vec3 pos;float power;};"),
        "struct Light{vec3 pos;float power;};"
    );
    assert_eq!(
        parse_one(parse_struct, "struct Light{vec3 pos;}light;"),
        "struct Light{vec3 pos;}light;"
    );
}

#[test]
fn inout_parsing() {
    assert_eq!(parse_one(parse_inout, "in vec3 normal;"), "in vec3 normal;");
    assert_eq!(
        parse_one(parse_inout, "layout(location=0)in vec3 pos;"),
        "layout(location=0)in vec3 pos;"
    );
    assert_eq!(
        parse_one(parse_inout, "layout(triangles)in;"),
        "layout(triangles)in;"
    );
    assert_eq!(
        parse_one(parse_inout, "layout(triangle_strip,max_vertices=4)out;"),
        "layout(triangle_strip,max_vertices=4)out;"
    );
    assert_eq!(
        parse_one(parse_inout, "out VData{vec3 normal;}vdata;"),
        "out VData{vec3 normal;}vdata;"
    );
    assert_eq!(
        parse_one(parse_inout, "out gl_PerVertex{vec4 gl_Position;};"),
        "out gl_PerVertex{vec4 gl_Position;};"
    );
}

#[test]
fn inout_struct_declares_its_instance() {
    let tokens = tokenize("out VData{vec3 normal;}vdata;");
    let (block, _) = parse_inout(&tokens).unwrap();
    let declared = block.borrow().names_declared();
    assert_eq!(declared.len(), 1);
    assert_eq!(declared[0].name(), "vdata");
    assert!(matches!(
        block.borrow().kind(),
        BlockKind::InoutStruct { .. }
    ));
}

#[test]
fn simplify_removes_redundant_parens() {
    let tokens = tokenize("a=((b));");
    let (block, _) = parse_assignment(&tokens).unwrap();
    let simplified = block.borrow_mut().simplify(-1);
    assert_eq!(simplified, 2);
    assert_eq!(block.borrow().format(), "a=b;");
}

#[test]
fn simplify_keeps_call_parens() {
    let tokens = tokenize("a=vec3(b)+rotate(c);");
    let (block, _) = parse_assignment(&tokens).unwrap();
    assert_eq!(block.borrow_mut().simplify(-1), 0);
    assert_eq!(block.borrow().format(), "a=vec3(b)+rotate(c);");
}

#[test]
fn simplify_honors_budget() {
    let tokens = tokenize("a=((b))+((c));");
    let (block, _) = parse_assignment(&tokens).unwrap();
    assert_eq!(block.borrow_mut().simplify(1), 1);
}

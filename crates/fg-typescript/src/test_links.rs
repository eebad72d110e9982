use fg_core::call_graph::{EdgeKind, TestLink};
use fg_core::SourceUnit;
use regex::Regex;
use std::sync::OnceLock;

static IT_BLOCK: OnceLock<Regex> = OnceLock::new();
static SERVICE_NAME: OnceLock<Regex> = OnceLock::new();
static COMPONENT_NAME: OnceLock<Regex> = OnceLock::new();
static MEMBER_CALL: OnceLock<Regex> = OnceLock::new();

fn it_block() -> &'static Regex {
    IT_BLOCK.get_or_init(|| {
        Regex::new(r#"\bit\s*\(\s*['"`]([^'"`]+)['"`]\s*,\s*(?:async\s*)?\(\s*\)\s*=>\s*\{([^}]+)\}"#)
            .expect("valid regex")
    })
}

fn service_name() -> &'static Regex {
    SERVICE_NAME.get_or_init(|| Regex::new(r"(\w+Service)").expect("valid regex"))
}

fn component_name() -> &'static Regex {
    COMPONENT_NAME.get_or_init(|| Regex::new(r"(\w+Component)").expect("valid regex"))
}

fn member_call() -> &'static Regex {
    MEMBER_CALL.get_or_init(|| Regex::new(r"(\w+)\s*\.\s*(\w+)\s*\(").expect("valid regex"))
}

/// Class a test file exercises: first `*Service`, else first `*Component`
pub fn tested_class(text: &str) -> String {
    service_name()
        .captures(text)
        .or_else(|| component_name().captures(text))
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// One link per `it('<desc>', () => { ... })` block whose body calls a member
pub fn extract_test_links(unit: &SourceUnit) -> Vec<TestLink> {
    let class = tested_class(&unit.text);

    it_block()
        .captures_iter(&unit.text)
        .filter_map(|caps| {
            let description = &caps[1];
            let call = member_call().captures(&caps[2])?;
            Some(TestLink {
                from: format!("Test::{}", description),
                to: format!("{}.{}", class, &call[2]),
                kind: EdgeKind::Tests,
                file: unit.path.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_core::parsers::SyntaxTree;

    fn unit(text: &str) -> SourceUnit {
        SourceUnit {
            path: "src/app/cart.component.spec.ts".into(),
            text: text.to_string(),
            tree: SyntaxTree::default(),
        }
    }

    #[test]
    fn links_each_it_block() {
        let unit = unit(
            r#"
describe('CartComponent', () => {
  it('adds an item', () => {
    component.addItem(item);
  });
  it("clears the cart", async () => {
    await component.clear();
  });
  it('renders', () => {
    expect(true);
  });
});
"#,
        );
        let links = extract_test_links(&unit);
        let pairs: Vec<(&str, &str)> = links
            .iter()
            .map(|l| (l.from.as_str(), l.to.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Test::adds an item", "CartComponent.addItem"),
                ("Test::clears the cart", "CartComponent.clear"),
            ]
        );
        assert_eq!(links[0].file, "src/app/cart.component.spec.ts");
        assert_eq!(serde_json::to_value(&links[0]).unwrap()["type"], "tests");
    }

    #[test]
    fn service_names_take_precedence() {
        assert_eq!(tested_class("CartComponent uses CartService"), "CartService");
        assert_eq!(tested_class("CartComponent only"), "CartComponent");
        assert_eq!(tested_class("nothing here"), "Unknown");
    }
}

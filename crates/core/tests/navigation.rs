mod common;

use common::{Fixture, MONEY, SHOP};
use gowalk_core::{Kind, Node, OptionCursorExt, PathCursor};

#[test]
fn test_absent_cursor_composes() {
    let fx = Fixture::new();
    let root = fx.shop();
    let missing = root.child("NoSuchThing");
    assert!(missing.is_none());
    for name in ["", "x", "Store", "a.b"] {
        assert!(missing.child(name).is_none());
        assert!(missing.var(name).is_none());
    }
    assert!(missing.ty().is_none());
    assert!(missing.ret().is_none());
    assert!(missing.body().is_none());
    assert!(missing.index(0).is_none());
    assert!(missing.child_list().is_empty());
    assert_eq!(missing.len(), -1);
    assert_eq!(missing.name(), "");
    assert_eq!(missing.doc(), "");
    assert_eq!(missing.src(), "");
    assert!(!missing.pos().is_valid());
}

#[test]
fn test_dotted_path_equals_chained_steps() {
    let fx = Fixture::new();
    let root = fx.shop();
    let pairs = [
        ("Store", "Items"),
        ("Store", "Add"),
        ("Store", "ID"),
        ("Default", "Till"),
        ("money", "Amount"),
        ("Store", "Missing"),
        ("Missing", "Store"),
    ];
    for (a, b) in pairs {
        assert_eq!(
            root.child(&format!("{a}.{b}")),
            root.child(a).child(b),
            "{a}.{b}"
        );
    }
    assert_eq!(root.child("Store.Till.Cents"), root.child("Store").child("Till").child("Cents"));
}

#[test]
fn test_empty_segments_are_skipped() {
    let fx = Fixture::new();
    let root = fx.shop();
    assert_eq!(root.child(""), Some(root.clone()));
    assert_eq!(root.child("Store..Items"), root.child("Store.Items"));
}

#[test]
fn test_root_child_list() {
    let fx = Fixture::new();
    let root = fx.shop();
    assert_eq!(
        root.child_list(),
        [
            "money",
            "Item",
            "fmt",
            "MaxItems",
            "MinItems",
            "Default",
            "Backup",
            "Base",
            "Base:Describe",
            "Store",
            "Store:Add",
            "Open"
        ]
    );
}

#[test]
fn test_grouped_spec_type() {
    let fx = Fixture::new();
    let root = fx.shop();
    let spec = root.child("MinItems").unwrap();
    assert_eq!(spec.kind(), Kind::ValueSpec);
    let Node::ValueSpec { ty: Some(declared), .. } = spec.node() else {
        panic!("MinItems should carry a type");
    };
    assert_eq!(spec.ty().value(), Some(*declared));
    assert_eq!(spec.ty().name(), "int");
    assert!(root.child("MaxItems").ty().is_none());

    let backup = root.child("Backup");
    assert_eq!(backup.ty().name(), "Store");
    assert_eq!(backup.ty().kind(), Some(Kind::Ident));
}

#[test]
fn test_method_resolution() {
    let fx = Fixture::new();
    let root = fx.shop();
    let add = root.child("Store:Add");
    assert_eq!(add.kind(), Some(Kind::FuncDecl));
    assert_eq!(root.child("Store").child("Add"), add);
    assert_eq!(root.child("Default.Add"), add);
    assert_eq!(root.child("Base").child("Describe"), root.child("Base:Describe"));
}

#[test]
fn test_embedded_field() {
    let fx = Fixture::new();
    let root = fx.shop();
    let store = root.child("Store");
    assert_eq!(store.child_list(), ["Base", "Items", "Till", "name", "owner"]);
    assert_eq!(root.child("Default").child_list(), store.child_list());

    let base = store.child("Base").unwrap();
    assert_eq!(base.kind(), Kind::Field);
    assert_eq!(base.ty().name(), "Base");

    let promoted = store.child("ID").unwrap();
    assert_eq!(promoted.kind(), Kind::Field);
    assert_eq!(Some(promoted), root.child("Base.ID"));
    assert_eq!(store.child("Describe"), root.child("Base:Describe"));
}

#[test]
fn test_follows_imports() {
    let fx = Fixture::new();
    let root = fx.shop();
    let money = root.child("money").unwrap();
    assert_eq!(money.kind(), Kind::Package);
    assert_eq!(money.package().import_path(), MONEY);
    assert_eq!(money.name(), "money");

    let cents = root.child("Store.Till.Cents").unwrap();
    assert_eq!(cents.kind(), Kind::Field);
    assert_eq!(cents.package().import_path(), MONEY);

    let string = root.child("money.Amount:String");
    assert_eq!(string.kind(), Some(Kind::FuncDecl));
    assert_eq!(root.child("money.Amount").child("String"), string);
    assert_eq!(root.child("Store.Till.String"), string);
    assert_eq!(root.child("Item.Price.Currency").kind(), Some(Kind::Field));

    assert!(root.child("fmt").is_none());
    assert_eq!(fx.store.parse_count(), 3);
}

#[test]
fn test_var_scopes() {
    let fx = Fixture::new();
    let root = fx.shop();
    let add = root.child("Store:Add");

    assert_eq!(add.var("s").kind(), Some(Kind::Field));
    assert_eq!(add.var("it").ty().name(), "Item");
    assert_eq!(add.var("err").kind(), Some(Kind::Field));
    assert_eq!(add.var("total").kind(), Some(Kind::AssignStmt));
    assert_eq!(add.var("last").kind(), Some(Kind::ValueSpec));
    assert_eq!(add.var("last").ty().name(), "Item");
    assert!(add.var("extra").is_none());
    assert!(add.var("i").is_none());
    assert_eq!(add.var("MaxItems"), root.child("MaxItems"));
    assert_eq!(add.var("s").child("Till.Cents").kind(), Some(Kind::Field));

    let total = add.var("total");
    assert_eq!(total.var("it").kind(), Some(Kind::Field));
    assert!(total.var("last").is_none());

    let open = root.child("Open");
    assert_eq!(open.var("handler").kind(), Some(Kind::AssignStmt));
    assert_eq!(open.var("prefix").kind(), Some(Kind::ValueSpec));
    assert_eq!(open.var("name").kind(), Some(Kind::Field));
    assert!(open.var("code").is_none());
}

#[test]
fn test_ret_body_index_len() {
    let fx = Fixture::new();
    let root = fx.shop();
    let add = root.child("Store:Add");

    let results = add.ret();
    assert_eq!(results.kind(), Some(Kind::FieldList));
    assert_eq!(results.len(), 2);
    assert_eq!(results.index(1).name(), "err");
    assert!(results.index(2).is_none());
    assert_eq!(add.ty().len(), -1);
    assert_eq!(add.body().kind(), Some(Kind::BlockStmt));
    assert!(root.child("MaxItems").body().is_none());
    assert_eq!(root.child("MaxItems").len(), -1);

    let fields = root.child("Store").ty();
    assert_eq!(fields.len(), 5);
    assert_eq!(fields.index(0).name(), "Base");
    assert_eq!(fields.index(3).value(), fields.index(4).value());
    assert_eq!(fields.index(4).name(), "owner");
}

#[test]
fn test_doc_comment_src_pos() {
    let fx = Fixture::new();
    let root = fx.shop();

    assert_eq!(root.child("Store").doc(), "Store holds items.\n");
    assert_eq!(root.child("Store:Add").doc(), "Add appends an item.\n");
    assert_eq!(root.child("MaxItems").doc(), "");
    assert_eq!(root.child("MinItems").comment(), "at least one\n");
    assert_eq!(root.child("money.Amount").doc(), "Amount is a value in cents.\n");

    assert_eq!(
        root.child("Base:Describe").src(),
        "func (b *Base) Describe() string { return b.ID }"
    );

    let pos = root.child("Store:Add").pos();
    assert_eq!((pos.line, pos.column), (37, 1));
    assert!(pos.filename.ends_with("shop.go"));
}

#[test]
fn test_cursor_info() {
    let fx = Fixture::new();
    let store: PathCursor = fx.shop().child("Store").unwrap();
    let info = store.info();
    assert_eq!(info.name, "Store");
    assert_eq!(info.kind, "TypeSpec");
    assert_eq!(info.package, SHOP);
    assert_eq!(info.pos.line, 29);
    assert_eq!(info.children.len(), 5);
}

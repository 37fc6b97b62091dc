use doctoken_core::{DateTime, Document, Node, ObjectId, TokenKind, TreeParser};

fn main() {
    let mut address = Document::new();
    address.insert("city", "Lisbon");
    address.insert("zip", "1100-148");

    let mut doc = Document::new();
    doc.insert("_id", ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap());
    doc.insert("name", "Ada");
    doc.insert("scores", vec![Node::Int32(3), Node::Double(4.5)]);
    doc.insert("address", address);
    doc.insert("joined", DateTime::from_millis(1_700_000_000_000));
    doc.insert("manager", Node::Null);
    let tree = Node::Document(doc);

    println!("Tokens:");
    let mut parser = TreeParser::new(&tree).unwrap();
    let mut indent = 0;
    while let Some(token) = parser.next_token().unwrap() {
        if token.is_structure_end() {
            indent -= 1;
        }
        let pad = "  ".repeat(indent + 1);
        match token {
            TokenKind::ValueEmbeddedObject => {
                println!("{}{} ({})", pad, token, parser.embedded_kind().unwrap());
            }
            _ => match parser.text() {
                Some(text) if !token.is_structure_start() && !token.is_structure_end() => {
                    println!("{}{}: {:?}", pad, token, text);
                }
                _ => println!("{}{}", pad, token),
            },
        }
        if token.is_structure_start() {
            indent += 1;
        }
    }
}

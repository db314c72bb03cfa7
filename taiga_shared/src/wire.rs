//! Wire protocol.
//!
//! Framing: a u32 big-endian length prefix followed by a JSON array payload
//! `[tag, args...]`. Tags are short strings and arguments are positional, so
//! argument order and arity are part of the protocol.
//!
//! Inbound traffic decodes into the closed [`ClientMsg`] enum once, at the
//! transport boundary. Unknown tags decode to `Ok(None)` so callers can drop
//! them; extra trailing arguments are ignored. Outbound messages are built
//! with [`ServerMsg`] and encoded to a frame once; the same bytes fan out
//! to every recipient.

use anyhow::Context;
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

use crate::{entity::WorldEntity, math::Vec2};

/// Frames with a payload larger than this are a protocol violation.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Messages a client may send.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMsg {
    /// "1": register and spawn. Payload is a `{name, skin}` object.
    Register { name: String, skin: i64 },
    /// "2": set the aim angle.
    Aim(f32),
    /// "3": set the movement angle; `None` stops.
    Move(Option<f32>),
    /// "4": manual attack state, optionally with a placement direction.
    Attack {
        attacking: bool,
        placing_angle: Option<f32>,
    },
    /// "5": select a held item by id.
    SelectItem { id: u64, is_weapon: bool },
    /// "7": flip the auto-attack flag.
    ToggleAutoAttack,
    /// "8": found an alliance.
    CreateClan(String),
    /// "9": leave the current alliance (disbands it for the owner).
    LeaveClan,
    /// "10": ask to join the named alliance.
    JoinClan(String),
    /// "11": owner resolves a pending join request.
    ResolveJoin { id: u32, accept: bool },
    /// "12": owner removes a member.
    KickMember(u32),
    /// "13": buy or equip a hat.
    Hat { buying: bool, id: u64 },
    /// "14": map ping.
    MapPing,
    /// "ch": chat line.
    Chat(String),
}

#[derive(Debug, Default, Deserialize)]
struct RegisterPayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    skin: i64,
}

impl ClientMsg {
    /// Decodes one frame payload. `Ok(None)` means an unrecognized tag.
    pub fn decode_payload(payload: &[u8]) -> anyhow::Result<Option<Self>> {
        let value: Value = serde_json::from_slice(payload).context("parse message payload")?;
        let items = match value {
            Value::Array(items) => items,
            _ => anyhow::bail!("message payload is not an array"),
        };
        let (tag, args) = match items.split_first() {
            Some((Value::String(tag), args)) => (tag.as_str(), args),
            Some(_) => anyhow::bail!("message tag is not a string"),
            None => anyhow::bail!("empty message payload"),
        };

        let msg = match tag {
            "1" => {
                let info: RegisterPayload =
                    serde_json::from_value(arg(args, 0, tag)?.clone()).context("parse register info")?;
                ClientMsg::Register {
                    name: info.name,
                    skin: info.skin,
                }
            }
            "2" => ClientMsg::Aim(num_arg(args, 0, tag)? as f32),
            "3" => match arg(args, 0, tag)? {
                Value::Null => ClientMsg::Move(None),
                v => ClientMsg::Move(Some(
                    v.as_f64()
                        .with_context(|| format!("tag {tag:?}: movement angle is not a number"))?
                        as f32,
                )),
            },
            "4" => ClientMsg::Attack {
                attacking: truthy(arg(args, 0, tag)?),
                placing_angle: args.get(1).and_then(|v| v.as_f64()).map(|a| a as f32),
            },
            "5" => ClientMsg::SelectItem {
                id: num_arg(args, 0, tag)? as u64,
                is_weapon: args.get(1).is_some_and(truthy),
            },
            "7" => {
                if args.first().is_some_and(truthy) {
                    ClientMsg::ToggleAutoAttack
                } else {
                    return Ok(None);
                }
            }
            "8" => ClientMsg::CreateClan(str_arg(args, 0, tag)?.to_string()),
            "9" => ClientMsg::LeaveClan,
            "10" => ClientMsg::JoinClan(str_arg(args, 0, tag)?.to_string()),
            "11" => ClientMsg::ResolveJoin {
                id: num_arg(args, 0, tag)? as u32,
                accept: args.get(1).is_some_and(truthy),
            },
            "12" => ClientMsg::KickMember(num_arg(args, 0, tag)? as u32),
            "13" => ClientMsg::Hat {
                buying: truthy(arg(args, 0, tag)?),
                id: num_arg(args, 1, tag)? as u64,
            },
            "14" => ClientMsg::MapPing,
            "ch" => ClientMsg::Chat(str_arg(args, 0, tag)?.to_string()),
            _ => return Ok(None),
        };
        Ok(Some(msg))
    }

    /// Encodes to an unframed JSON payload. The 0/1 flags mirror what stock
    /// clients emit.
    pub fn encode_payload(&self) -> anyhow::Result<Vec<u8>> {
        let value = match self {
            ClientMsg::Register { name, skin } => json!(["1", { "name": name, "skin": skin }]),
            ClientMsg::Aim(angle) => json!(["2", angle]),
            ClientMsg::Move(angle) => json!(["3", angle]),
            ClientMsg::Attack {
                attacking,
                placing_angle: Some(dir),
            } => json!(["4", *attacking as u8, dir]),
            ClientMsg::Attack {
                attacking,
                placing_angle: None,
            } => json!(["4", *attacking as u8]),
            ClientMsg::SelectItem { id, is_weapon } => json!(["5", id, is_weapon]),
            ClientMsg::ToggleAutoAttack => json!(["7", 1]),
            ClientMsg::CreateClan(name) => json!(["8", name]),
            ClientMsg::LeaveClan => json!(["9"]),
            ClientMsg::JoinClan(name) => json!(["10", name]),
            ClientMsg::ResolveJoin { id, accept } => json!(["11", id, *accept as u8]),
            ClientMsg::KickMember(id) => json!(["12", id]),
            ClientMsg::Hat { buying, id } => json!(["13", *buying as u8, id]),
            ClientMsg::MapPing => json!(["14"]),
            ClientMsg::Chat(text) => json!(["ch", text]),
        };
        serde_json::to_vec(&value).context("serialize message")
    }

    /// Encodes to a complete length-prefixed frame.
    pub fn encode_frame(&self) -> anyhow::Result<Bytes> {
        Ok(frame(self.encode_payload()?))
    }
}

fn arg<'a>(args: &'a [Value], idx: usize, tag: &str) -> anyhow::Result<&'a Value> {
    args.get(idx)
        .with_context(|| format!("tag {tag:?} missing argument {idx}"))
}

fn num_arg(args: &[Value], idx: usize, tag: &str) -> anyhow::Result<f64> {
    arg(args, idx, tag)?
        .as_f64()
        .with_context(|| format!("tag {tag:?} argument {idx} is not a number"))
}

fn str_arg<'a>(args: &'a [Value], idx: usize, tag: &str) -> anyhow::Result<&'a str> {
    arg(args, idx, tag)?
        .as_str()
        .with_context(|| format!("tag {tag:?} argument {idx} is not a string"))
}

/// Loose boolean: `false`, `null` and zero are false, other scalars true.
fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::Null => false,
        _ => true,
    }
}

/// One session's row in the full status snapshot ("2").
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRow {
    /// Connection token, distinct from the numeric session id.
    pub token: String,
    pub id: u32,
    pub name: String,
    pub pos: Vec2,
    pub aim: f32,
    pub health: i32,
    pub max_health: i32,
    pub size: f32,
    pub skin: u8,
}

/// One session's row in the movement snapshot ("3").
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub id: u32,
    pub pos: Vec2,
    pub aim: f32,
    /// Held building id; encodes as -1 when none.
    pub building: Option<u16>,
    pub weapon: u16,
    pub clan: Option<String>,
    pub is_clan_owner: bool,
    pub hat: u64,
}

/// One leaderboard entry ("5").
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub id: u32,
    pub name: String,
    pub points: u64,
}

/// Alliance summary used by the directory ("id") and creation ("ac") notices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClanInfo {
    pub sid: String,
    pub owner: u32,
}

/// Messages the server sends. Encode-only; clients are the decoders.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMsg {
    /// "1": the id assigned at registration.
    AssignId { id: u32 },
    /// "2": full status of one session, with the is-self flag.
    Status { row: StatusRow, is_self: bool },
    /// "a": marker preceding every movement snapshot.
    SnapshotMarker,
    /// "3": movement snapshot of every alive session, flattened.
    Snapshot { rows: Vec<SnapshotRow> },
    /// "5": leaderboard, flattened (id, name, points) triples.
    Leaderboard { rows: Vec<LeaderboardRow> },
    /// "6": newly revealed static entities, flattened tuples.
    Reveal { entities: Vec<WorldEntity> },
    /// "7": an attack swing by the given session.
    AttackSwing { id: u32 },
    /// "15": level progress for the receiving session.
    LevelInfo { xp: u64, max_xp: u64, level: u32 },
    /// "mm": teammate minimap positions, flattened (x, y) pairs.
    Minimap { points: Vec<Vec2> },
    /// "p": map ping flash.
    PingFlash { pos: Vec2 },
    /// "d": forced disconnect notice.
    Disconnect { reason: String },
    /// "ch": chat line relayed from the given session.
    Chat { id: u32, text: String },
    /// "id": alliance directory sent on connect.
    ClanDirectory { teams: Vec<ClanInfo> },
    /// "ac": alliance created.
    ClanCreated { info: ClanInfo },
    /// "ad": alliance disbanded.
    ClanDisbanded { sid: String },
    /// "an": join request, delivered to the owner.
    JoinRequest { id: u32, name: String },
    /// "sa": member list of the receiver's alliance, flattened (id, name).
    MemberList { members: Vec<(u32, String)> },
    /// "st": the receiver's own alliance changed; no fields means left.
    ClanNotice { team: Option<(String, bool)> },
    /// "us": hat ownership (0) or equipment (1) update.
    HatUpdate { equipped: bool, id: u64 },
}

impl ServerMsg {
    pub fn encode_payload(&self) -> anyhow::Result<Vec<u8>> {
        let value = match self {
            ServerMsg::AssignId { id } => json!(["1", id]),
            ServerMsg::Status { row, is_self } => json!([
                "2",
                [
                    row.token,
                    row.id,
                    row.name,
                    row.pos.x,
                    row.pos.y,
                    row.aim,
                    row.health,
                    row.max_health,
                    row.size,
                    row.skin
                ],
                is_self
            ]),
            ServerMsg::SnapshotMarker => json!(["a"]),
            ServerMsg::Snapshot { rows } => {
                let mut flat = Vec::with_capacity(rows.len() * 12);
                for row in rows {
                    flat.push(json!(row.id));
                    flat.push(json!(row.pos.x));
                    flat.push(json!(row.pos.y));
                    flat.push(json!(row.aim));
                    flat.push(json!(row.building.map(i64::from).unwrap_or(-1)));
                    flat.push(json!(row.weapon));
                    flat.push(json!(0));
                    flat.push(json!(row.clan));
                    flat.push(json!(row.is_clan_owner as u8));
                    flat.push(json!(row.hat));
                    flat.push(json!(0));
                    flat.push(json!(0));
                }
                json!(["3", flat])
            }
            ServerMsg::Leaderboard { rows } => {
                let mut flat = Vec::with_capacity(rows.len() * 3);
                for row in rows {
                    flat.push(json!(row.id));
                    flat.push(json!(row.name));
                    flat.push(json!(row.points));
                }
                json!(["5", flat])
            }
            ServerMsg::Reveal { entities } => {
                let mut flat = Vec::with_capacity(entities.len() * 8);
                for ent in entities {
                    flat.push(json!(ent.id));
                    flat.push(json!(ent.pos.x));
                    flat.push(json!(ent.pos.y));
                    flat.push(json!(ent.angle));
                    flat.push(json!(ent.size));
                    flat.push(json!(ent.kind.code()));
                    flat.push(Value::Null);
                    flat.push(json!(-1));
                }
                json!(["6", flat])
            }
            ServerMsg::AttackSwing { id } => json!(["7", id, 0, 0]),
            ServerMsg::LevelInfo { xp, max_xp, level } => json!(["15", xp, max_xp, level]),
            ServerMsg::Minimap { points } => {
                let mut flat = Vec::with_capacity(points.len() * 2);
                for p in points {
                    flat.push(json!(p.x));
                    flat.push(json!(p.y));
                }
                json!(["mm", flat])
            }
            ServerMsg::PingFlash { pos } => json!(["p", pos.x, pos.y]),
            ServerMsg::Disconnect { reason } => json!(["d", reason]),
            ServerMsg::Chat { id, text } => json!(["ch", id, text]),
            ServerMsg::ClanDirectory { teams } => json!(["id", { "teams": teams }]),
            ServerMsg::ClanCreated { info } => json!(["ac", info]),
            ServerMsg::ClanDisbanded { sid } => json!(["ad", sid]),
            ServerMsg::JoinRequest { id, name } => json!(["an", id, name]),
            ServerMsg::MemberList { members } => {
                let mut flat = Vec::with_capacity(members.len() * 2);
                for (id, name) in members {
                    flat.push(json!(id));
                    flat.push(json!(name));
                }
                json!(["sa", flat])
            }
            ServerMsg::ClanNotice { team: Some((sid, is_owner)) } => json!(["st", sid, is_owner]),
            ServerMsg::ClanNotice { team: None } => json!(["st"]),
            ServerMsg::HatUpdate { equipped, id } => json!(["us", *equipped as u8, id]),
        };
        serde_json::to_vec(&value).context("serialize message")
    }

    /// Encodes to a complete frame, ready to clone into outbound queues.
    pub fn encode_frame(&self) -> anyhow::Result<Bytes> {
        Ok(frame(self.encode_payload()?))
    }
}

fn frame(payload: Vec<u8>) -> Bytes {
    let mut buf = BytesMut::with_capacity(4 + payload.len());
    buf.put_u32(payload.len() as u32);
    buf.extend_from_slice(&payload);
    buf.freeze()
}

/// Reads one length-prefixed frame payload. EOF mid-frame is an error.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> anyhow::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader
        .read_exact(&mut len_buf)
        .await
        .context("read frame len")?;
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        anyhow::bail!("frame too large: {len} bytes");
    }
    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .context("read frame payload")?;
    Ok(payload)
}

/// Writes one payload as a length-prefixed frame.
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> anyhow::Result<()> {
    if payload.len() > MAX_FRAME_LEN {
        anyhow::bail!("frame too large: {} bytes", payload.len());
    }
    let mut buf = BytesMut::with_capacity(4 + payload.len());
    buf.put_u32(payload.len() as u32);
    buf.extend_from_slice(payload);
    writer.write_all(&buf).await.context("write frame")?;
    Ok(())
}

/// Framed connection over TCP. The server splits the stream into halves for
/// its reader/writer tasks; tests and clients use this whole.
#[derive(Debug)]
pub struct FramedConn {
    stream: TcpStream,
}

impl FramedConn {
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }

    pub async fn connect(addr: SocketAddr) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await.context("tcp connect")?;
        Ok(Self { stream })
    }

    pub async fn send(&mut self, msg: &ClientMsg) -> anyhow::Result<()> {
        write_frame(&mut self.stream, &msg.encode_payload()?).await
    }

    pub async fn send_server(&mut self, msg: &ServerMsg) -> anyhow::Result<()> {
        write_frame(&mut self.stream, &msg.encode_payload()?).await
    }

    /// Receives the next frame as a parsed `[tag, args...]` array.
    pub async fn recv(&mut self) -> anyhow::Result<Value> {
        let payload = read_frame(&mut self.stream).await?;
        serde_json::from_slice(&payload).context("parse frame payload")
    }

    pub fn peer_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.stream.peer_addr()?)
    }

    pub fn into_inner(self) -> TcpStream {
        self.stream
    }
}

/// TCP server listener yielding framed connections.
pub struct FramedListener {
    listener: TcpListener,
}

impl FramedListener {
    pub async fn bind(addr: SocketAddr) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await.context("tcp bind")?;
        Ok(Self { listener })
    }

    pub async fn accept(&self) -> anyhow::Result<(FramedConn, SocketAddr)> {
        let (stream, addr) = self.listener.accept().await.context("tcp accept")?;
        Ok((FramedConn::new(stream), addr))
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ResourceKind;

    fn decode(v: Value) -> anyhow::Result<Option<ClientMsg>> {
        ClientMsg::decode_payload(&serde_json::to_vec(&v).unwrap())
    }

    #[test]
    fn register_decodes_with_partial_payload() {
        let msg = decode(json!(["1", { "name": "bob", "skin": 3 }])).unwrap();
        assert_eq!(
            msg,
            Some(ClientMsg::Register {
                name: "bob".into(),
                skin: 3
            })
        );

        // Missing fields fall back to defaults; sanitizing happens later.
        let msg = decode(json!(["1", {}])).unwrap();
        assert_eq!(
            msg,
            Some(ClientMsg::Register {
                name: String::new(),
                skin: 0
            })
        );
    }

    #[test]
    fn movement_null_means_stop() {
        assert_eq!(decode(json!(["3", null])).unwrap(), Some(ClientMsg::Move(None)));
        let msg = decode(json!(["3", 1.5])).unwrap();
        assert_eq!(msg, Some(ClientMsg::Move(Some(1.5))));
    }

    #[test]
    fn attack_accepts_numeric_flags() {
        let msg = decode(json!(["4", 1])).unwrap();
        assert_eq!(
            msg,
            Some(ClientMsg::Attack {
                attacking: true,
                placing_angle: None
            })
        );
        let msg = decode(json!(["4", 0, 2.5])).unwrap();
        assert_eq!(
            msg,
            Some(ClientMsg::Attack {
                attacking: false,
                placing_angle: Some(2.5)
            })
        );
    }

    #[test]
    fn unknown_tags_are_skipped_not_errors() {
        assert_eq!(decode(json!(["zz", 1, 2, 3])).unwrap(), None);
        // Auto-attack with a zero argument is a no-op, same treatment.
        assert_eq!(decode(json!(["7", 0])).unwrap(), None);
    }

    #[test]
    fn malformed_payloads_are_errors() {
        assert!(decode(json!({ "tag": "1" })).is_err());
        assert!(decode(json!([42, 1])).is_err());
        assert!(decode(json!([])).is_err());
        assert!(decode(json!(["2"])).is_err(), "aim needs its angle");
        assert!(ClientMsg::decode_payload(b"not json").is_err());
    }

    #[test]
    fn client_encode_decode_agree() {
        for msg in [
            ClientMsg::Register {
                name: "ada".into(),
                skin: 2,
            },
            ClientMsg::Move(None),
            ClientMsg::ResolveJoin { id: 7, accept: true },
            ClientMsg::Chat("hi".into()),
        ] {
            let payload = msg.encode_payload().unwrap();
            assert_eq!(ClientMsg::decode_payload(&payload).unwrap(), Some(msg));
        }
    }

    fn payload_of(msg: &ServerMsg) -> Value {
        serde_json::from_slice(&msg.encode_payload().unwrap()).unwrap()
    }

    #[test]
    fn status_shape() {
        let msg = ServerMsg::Status {
            row: StatusRow {
                token: "c1".into(),
                id: 0,
                name: "unknown".into(),
                pos: Vec2::new(100.0, 200.0),
                aim: 0.0,
                health: 100,
                max_health: 100,
                size: 35.0,
                skin: 0,
            },
            is_self: true,
        };
        assert_eq!(
            payload_of(&msg),
            json!(["2", ["c1", 0, "unknown", 100.0, 200.0, 0.0, 100, 100, 35.0, 0], true])
        );
    }

    #[test]
    fn snapshot_rows_flatten_to_twelve_columns() {
        let msg = ServerMsg::Snapshot {
            rows: vec![SnapshotRow {
                id: 1,
                pos: Vec2::new(5.0, 6.0),
                aim: 0.5,
                building: None,
                weapon: 0,
                clan: Some("axe".into()),
                is_clan_owner: true,
                hat: 0,
            }],
        };
        assert_eq!(
            payload_of(&msg),
            json!(["3", [1, 5.0, 6.0, 0.5, -1, 0, 0, "axe", 1, 0, 0, 0]])
        );
    }

    #[test]
    fn reveal_rows_carry_kind_and_trailer() {
        let msg = ServerMsg::Reveal {
            entities: vec![WorldEntity {
                id: 50,
                pos: Vec2::new(10.0, 20.0),
                angle: 1.0,
                size: 150.0,
                kind: ResourceKind::Tree,
            }],
        };
        assert_eq!(
            payload_of(&msg),
            json!(["6", [50, 10.0, 20.0, 1.0, 150.0, 0, null, -1]])
        );
    }

    #[test]
    fn leaderboard_and_minimap_flatten() {
        let msg = ServerMsg::Leaderboard {
            rows: vec![
                LeaderboardRow {
                    id: 1,
                    name: "ada".into(),
                    points: 30,
                },
                LeaderboardRow {
                    id: 0,
                    name: "bob".into(),
                    points: 10,
                },
            ],
        };
        assert_eq!(payload_of(&msg), json!(["5", [1, "ada", 30, 0, "bob", 10]]));

        let msg = ServerMsg::Minimap {
            points: vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)],
        };
        assert_eq!(payload_of(&msg), json!(["mm", [1.0, 2.0, 3.0, 4.0]]));
    }

    #[test]
    fn clan_notices() {
        let msg = ServerMsg::ClanCreated {
            info: ClanInfo {
                sid: "axe".into(),
                owner: 3,
            },
        };
        assert_eq!(payload_of(&msg), json!(["ac", { "sid": "axe", "owner": 3 }]));

        let msg = ServerMsg::ClanNotice {
            team: Some(("axe".into(), false)),
        };
        assert_eq!(payload_of(&msg), json!(["st", "axe", false]));
        assert_eq!(payload_of(&ServerMsg::ClanNotice { team: None }), json!(["st"]));

        let msg = ServerMsg::ClanDirectory {
            teams: vec![ClanInfo {
                sid: "axe".into(),
                owner: 3,
            }],
        };
        assert_eq!(payload_of(&msg), json!(["id", { "teams": [{ "sid": "axe", "owner": 3 }] }]));
    }

    #[test]
    fn attack_swing_shape() {
        assert_eq!(payload_of(&ServerMsg::AttackSwing { id: 4 }), json!(["7", 4, 0, 0]));
    }

    #[tokio::test]
    async fn frames_roundtrip_over_a_duplex_pipe() {
        let (mut a, mut b) = tokio::io::duplex(1024);
        let msg = ServerMsg::Disconnect {
            reason: "server is full".into(),
        };
        write_frame(&mut a, &msg.encode_payload().unwrap()).await.unwrap();
        let payload = read_frame(&mut b).await.unwrap();
        let value: Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value, json!(["d", "server is full"]));
    }

    #[tokio::test]
    async fn oversized_frames_are_rejected() {
        let (mut a, mut b) = tokio::io::duplex(64);
        let len = (MAX_FRAME_LEN as u32 + 1).to_be_bytes();
        tokio::io::AsyncWriteExt::write_all(&mut a, &len).await.unwrap();
        let err = read_frame(&mut b).await.unwrap_err();
        assert!(err.to_string().contains("frame too large"));
    }
}

//! Fixed seed population loaded once when the store initializes.

use serde_json::{json, Value};

use crate::collection::Collection;
use crate::record::{Fields, Record, RecordId};

fn record(id: u64, value: Value) -> Record {
    let fields = match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    };
    Record::new(RecordId(id), fields)
}

/// Seed records of one collection, in display order.
pub fn seed_records(collection: Collection) -> Vec<Record> {
    match collection {
        Collection::Announcement => announcements(),
        Collection::Ministry => ministries(),
        Collection::Subscriber => Vec::new(),
        Collection::Event => events(),
        Collection::Sermon => sermons(),
        Collection::Gallery => gallery(),
        Collection::Notification => notifications(),
    }
}

/// Largest id used anywhere in the seed data.
pub fn max_seed_id() -> u64 {
    Collection::ALL
        .into_iter()
        .flat_map(seed_records)
        .map(|r| r.id.0)
        .max()
        .unwrap_or(0)
}

fn announcements() -> Vec<Record> {
    vec![
        record(1, json!({
            "title": "Service de Noël",
            "content": "Rejoignez-nous pour notre service spécial de Noël",
            "publish_date": "2024-12-25",
            "type": "event",
            "is_published": true
        })),
        record(2, json!({
            "title": "Groupe de prière",
            "content": "Nouveau groupe de prière chaque mercredi soir",
            "publish_date": "2024-12-20",
            "type": "prayer",
            "is_published": true
        })),
        record(3, json!({
            "title": "Collecte alimentaire",
            "content": "Aidez-nous à collecter des denrées pour les familles dans le besoin",
            "publish_date": "2024-12-18",
            "type": "general",
            "is_published": true
        })),
    ]
}

fn ministries() -> Vec<Record> {
    vec![
        record(1, json!({
            "name": "Ministère de louange",
            "description": "Conduire l'église dans l'adoration et la présence de Dieu",
            "icon": "Music"
        })),
        record(2, json!({
            "name": "Ministère de prière",
            "description": "Intercéder pour l'église, les membres et les nations",
            "icon": "HandHeart"
        })),
        record(3, json!({
            "name": "Ministère jeunesse",
            "description": "Former et équiper la jeune génération pour Christ",
            "icon": "Users"
        })),
        record(4, json!({
            "name": "Ministère des enfants",
            "description": "Enseigner les enfants dans les voies du Seigneur",
            "icon": "Baby"
        })),
        record(5, json!({
            "name": "Ministère social",
            "description": "Servir la communauté et aider les personnes dans le besoin",
            "icon": "Heart"
        })),
    ]
}

fn events() -> Vec<Record> {
    vec![record(1, json!({
        "title": "EBIMPÉ 25-26 | TRAVERSÉE DES ÉGLISES VASES D'HONNEUR",
        "description": "Grand rassemblement des Églises Vases d'Honneur avec l'apôtre Mohammed Sanogo. Venez partager l'amour de Christ pour une nouvelle année bénie.",
        "event_date": "2025-12-31",
        "start_time": "21:00",
        "end_time": "02:00",
        "location": "Stade Olympique d'Ébimpé",
        "image_url": "/ebimper.jpg",
        "is_featured": true
    }))]
}

fn sermons() -> Vec<Record> {
    vec![
        record(1, json!({
            "title": "La puissance de la prière",
            "description": "Découvrez comment la prière peut transformer votre vie et vous rapprocher de Dieu. Un enseignement profond sur l'intimité avec le Père.",
            "preacher": "Apôtre Mohammed Sanogo",
            "sermon_date": "2025-12-15",
            "scripture_reference": "Matthieu 6:9-13",
            "video_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "thumbnail_url": "https://images.unsplash.com/photo-1507692049790-de58290a4334?w=400&q=80"
        })),
        record(2, json!({
            "title": "Marcher dans la foi",
            "description": "La foi est le fondement de notre relation avec Dieu. Apprenez à développer une foi inébranlable.",
            "preacher": "Pasteur Jean-Marc",
            "sermon_date": "2025-12-08",
            "scripture_reference": "Hébreux 11:1-6",
            "audio_url": "/audio/sermon2.mp3",
            "thumbnail_url": "https://images.unsplash.com/photo-1519491050282-cf00c82424bd?w=400&q=80"
        })),
        record(3, json!({
            "title": "L'amour inconditionnel de Dieu",
            "description": "Dieu nous aime d'un amour éternel. Venez découvrir la profondeur de Son amour pour vous.",
            "preacher": "Apôtre Mohammed Sanogo",
            "sermon_date": "2025-12-01",
            "scripture_reference": "Jean 3:16",
            "video_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "thumbnail_url": "https://images.unsplash.com/photo-1438232992991-995b7058bbb3?w=400&q=80"
        })),
    ]
}

fn gallery() -> Vec<Record> {
    vec![
        record(1, json!({
            "title": "Traversée Ebimpé 25-26",
            "description": "Grand rassemblement des Églises Vases d'Honneur",
            "media_type": "photo",
            "media_url": "/ebimper.jpg",
            "thumbnail_url": "/ebimper.jpg",
            "event_name": "Ebimpé 25-26",
            "event_date": "2025-12-31",
            "is_featured": true
        })),
        record(2, json!({
            "title": "Culte de louange",
            "description": "Moments de louange et d'adoration",
            "media_type": "photo",
            "media_url": "/louange.jpg",
            "thumbnail_url": "/louange.jpg",
            "event_name": "Culte dominical",
            "event_date": "2025-12-15",
            "is_featured": true
        })),
        record(3, json!({
            "title": "Culte spécial",
            "description": "Moments forts de notre culte spécial avec la jeunesse",
            "media_type": "photo",
            "media_url": "/culte1.jpg",
            "thumbnail_url": "/culte1.jpg",
            "event_name": "Culte spécial jeunesse",
            "event_date": "2025-12-20",
            "is_featured": true
        })),
    ]
}

fn notifications() -> Vec<Record> {
    vec![
        record(1, json!({
            "title": "Rappel de culte",
            "message": "Rejoignez-nous ce dimanche à 9h pour célébrer ensemble.",
            "channel": "all",
            "scheduled_date": "2025-12-20",
            "is_sent": false,
            "created_date": "2025-12-18T10:00:00Z"
        })),
        record(2, json!({
            "title": "Intercession spéciale",
            "message": "Veillée de prière vendredi soir - activez vos équipes.",
            "channel": "whatsapp",
            "scheduled_date": "2025-12-22",
            "is_sent": true,
            "created_date": "2025-12-17T15:30:00Z"
        })),
    ]
}
